//! Bulk transaction payloads.
//!
//! An external model (or a client) may hand over transactions already
//! structured as a JSON array:
//!
//! ```json
//! [{"date": "2024-03-12", "description": "Big Bazaar", "category": "Groceries", "amount": 450.75}]
//! ```
//!
//! Model output is often wrapped in a markdown code fence, which is removed
//! before parsing. Entries go through the same assembler as extracted text.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::assemble::{RawCandidate, assemble};
use crate::error::{ExtractError, Result};
use crate::types::{ImportSource, TransactionRecord, TxnType};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BulkEntry {
    date: Option<String>,
    description: Option<String>,
    category: Option<String>,
    amount: Option<Value>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

impl BulkEntry {
    fn into_candidate(self) -> RawCandidate {
        let amount = match self.amount {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        let kind = match self.kind.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("income") => TxnType::Income,
            _ => TxnType::Expense,
        };

        RawCandidate {
            date: self.date.unwrap_or_default(),
            amount,
            category: self.category,
            description: self.description,
            kind: Some(kind),
        }
    }
}

/// Remove a surrounding ```` ```json ```` (or bare ```` ``` ````) fence.
pub fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let Some(inner) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Parse a JSON array of transactions into validated records.
pub fn parse_bulk_payload(text: &str) -> Result<Vec<TransactionRecord>> {
    let json = strip_code_fence(text);
    let entries: Vec<BulkEntry> =
        serde_json::from_str(json).map_err(|e| ExtractError::InvalidPayload(e.to_string()))?;

    let total = entries.len();
    let records = assemble(
        entries.into_iter().map(BulkEntry::into_candidate),
        ImportSource::Bulk,
    );
    debug!(total, kept = records.len(), "bulk entries assembled");

    if records.is_empty() {
        return Err(ExtractError::NoValidTransactions);
    }
    info!(count = records.len(), "bulk transactions accepted");
    Ok(records)
}
