//! Document-level pipeline: choose the extractor for the document kind and
//! turn an empty outcome into a reportable failure.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ExtractError, Result};
use crate::parsers::line_pattern::{
    DEFAULT_CURRENCY_SYMBOL, DEFAULT_FALLBACK_WINDOW, LineGrammar, extract_from_lines_with,
};
use crate::parsers::sectioned::extract_from_sections;
use crate::source::TextSource;
use crate::types::TransactionRecord;

/// Ordered records from one document, or why there are none.
pub type ExtractionResult = Result<Vec<TransactionRecord>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Label-sectioned receipt (scanned image or PDF)
    Receipt,
    /// Multi-row statement (PDF)
    Statement,
}

impl DocumentKind {
    pub fn accepts(&self, mime: &str) -> bool {
        match self {
            DocumentKind::Receipt => {
                mime.starts_with("image/") || mime == "application/pdf" || mime == "text/plain"
            }
            DocumentKind::Statement => mime == "application/pdf" || mime == "text/plain",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    pub currency_symbol: String,
    pub fallback_window: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            fallback_window: DEFAULT_FALLBACK_WINDOW,
        }
    }
}

fn non_empty(records: Vec<TransactionRecord>) -> ExtractionResult {
    if records.is_empty() {
        Err(ExtractError::NoValidTransactions)
    } else {
        Ok(records)
    }
}

pub fn extract_receipt(text: &str) -> ExtractionResult {
    let records = non_empty(extract_from_sections(text))?;
    info!(count = records.len(), "receipt transactions extracted");
    Ok(records)
}

pub fn extract_statement(text: &str, options: &ExtractOptions) -> ExtractionResult {
    let grammar = LineGrammar::new(&options.currency_symbol)?;
    let records = non_empty(extract_from_lines_with(&grammar, text, options.fallback_window)?)?;
    info!(count = records.len(), "statement transactions extracted");
    Ok(records)
}

pub fn extract_from_text(
    kind: DocumentKind,
    text: &str,
    options: &ExtractOptions,
) -> ExtractionResult {
    match kind {
        DocumentKind::Receipt => extract_receipt(text),
        DocumentKind::Statement => extract_statement(text, options),
    }
}

/// Full path from uploaded bytes: type check, text recovery, extraction.
pub fn extract_document(
    kind: DocumentKind,
    bytes: &[u8],
    mime: &str,
    source: &dyn TextSource,
    options: &ExtractOptions,
) -> ExtractionResult {
    if !kind.accepts(mime) {
        return Err(ExtractError::UnsupportedInput(format!(
            "{mime} is not accepted for {kind:?} documents"
        )));
    }

    let text = source.extract_text(bytes, mime)?;
    extract_from_text(kind, &text, options)
}
