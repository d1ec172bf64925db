//! Record assembly: turn raw candidate tuples into validated records.

use tracing::debug;

use crate::tokens::{parse_amount, parse_date};
use crate::types::{DEFAULT_CATEGORY, ImportSource, TransactionRecord, TxnType};

/// An unvalidated transaction as lifted out of the document text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCandidate {
    pub date: String,
    pub amount: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub kind: Option<TxnType>,
}

impl RawCandidate {
    pub fn new(date: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            amount: amount.into(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_kind(mut self, kind: TxnType) -> Self {
        self.kind = Some(kind);
        self
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Validate and default each candidate, keeping document order.
///
/// Candidates whose date or amount does not normalize are dropped. Identical
/// candidates produce identical records; duplicate charges are real.
pub fn assemble<I>(candidates: I, source: ImportSource) -> Vec<TransactionRecord>
where
    I: IntoIterator<Item = RawCandidate>,
{
    let mut out = Vec::new();

    for c in candidates {
        let date = match parse_date(&c.date) {
            Ok(d) => d,
            Err(e) => {
                debug!(error = %e, "skipping candidate");
                continue;
            }
        };
        let amount = match parse_amount(&c.amount) {
            Ok(a) => a,
            Err(e) => {
                debug!(error = %e, "skipping candidate");
                continue;
            }
        };

        out.push(TransactionRecord {
            kind: c.kind.unwrap_or_default(),
            amount,
            category: non_blank(c.category.as_deref())
                .unwrap_or(DEFAULT_CATEGORY)
                .to_string(),
            date,
            description: non_blank(c.description.as_deref())
                .unwrap_or(source.default_description())
                .to_string(),
        });
    }

    out
}
