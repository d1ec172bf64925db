//! Shapes handed to an HTTP-style boundary.

use serde::Serialize;

use crate::error::ExtractError;
use crate::extract::{DocumentKind, ExtractionResult};
use crate::types::TransactionRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportSummary {
    pub message: String,
    pub count: usize,
    pub transactions: Vec<TransactionRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    /// 400 for document problems, 500 for internal faults
    pub status: u16,
    /// Stable key for client-side messaging
    pub error: &'static str,
    pub message: String,
}

impl From<&ExtractError> for ErrorBody {
    fn from(err: &ExtractError) -> Self {
        let status = if err.is_client_error() { 400 } else { 500 };
        let message = if err.is_client_error() {
            err.to_string()
        } else {
            "failed to import transactions".to_string()
        };
        ErrorBody {
            status,
            error: err.message_key(),
            message,
        }
    }
}

fn label(kind: Option<DocumentKind>) -> &'static str {
    match kind {
        Some(DocumentKind::Receipt) => "Receipt uploaded",
        Some(DocumentKind::Statement) => "Transaction history imported",
        None => "Bulk transactions added",
    }
}

/// Map an extraction outcome to a success summary or an error body.
///
/// `kind` is `None` for bulk payloads.
pub fn respond(
    kind: Option<DocumentKind>,
    result: ExtractionResult,
) -> Result<ImportSummary, ErrorBody> {
    match result {
        Ok(transactions) => Ok(ImportSummary {
            message: format!("{}: {} transactions", label(kind), transactions.len()),
            count: transactions.len(),
            transactions,
        }),
        Err(err) => Err(ErrorBody::from(&err)),
    }
}
