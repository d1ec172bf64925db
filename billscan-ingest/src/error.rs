//! Error types for the extraction pipeline.
//!
//! Token-level failures (`TokenError`) are recovered where they happen: the
//! offending candidate is dropped and extraction carries on. Document-level
//! failures (`ExtractError`) end one extraction call and are reported to the
//! caller as distinct outcomes.

use thiserror::Error;

/// A single date or amount token that could not be normalized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid date: {0:?}")]
    InvalidDate(String),

    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    /// A token pattern failed to compile.
    #[error("token pattern error: {0}")]
    Pattern(String),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    /// The statement path found no date-shaped text, even after re-segmentation.
    #[error("no dates found in document")]
    NoDatesFound,

    /// Candidates existed but none survived date/amount validation.
    #[error("no valid transactions found in document")]
    NoValidTransactions,

    #[error("unsupported input: {0}")]
    UnsupportedInput(String),

    /// The text source collaborator could not produce text.
    #[error("text extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("invalid transaction payload: {0}")]
    InvalidPayload(String),

    #[error("persisting transactions failed: {0}")]
    Sink(String),

    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl ExtractError {
    /// Whether the failure is the caller's (bad or unusable document) rather
    /// than an internal fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ExtractError::NoDatesFound
                | ExtractError::NoValidTransactions
                | ExtractError::UnsupportedInput(_)
                | ExtractError::InvalidPayload(_)
        )
    }

    /// Stable key for user-facing messaging.
    pub fn message_key(&self) -> &'static str {
        match self {
            ExtractError::NoDatesFound => "no_dates_found",
            ExtractError::NoValidTransactions => "no_valid_transactions",
            ExtractError::UnsupportedInput(_) => "unsupported_input",
            ExtractError::InvalidPayload(_) => "invalid_payload",
            ExtractError::ExtractionFailed(_)
            | ExtractError::Sink(_)
            | ExtractError::Regex(_) => "internal_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
