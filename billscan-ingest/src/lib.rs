//! billscan-ingest: turn OCR/extracted document text into transaction records.
//!
//! Receipts with `Date / Description / Category / Amount` sections go through
//! the sectioned parser; statements go through the line grammar with its
//! re-segmentation fallback. Both share the date/amount token parsers and the
//! record assembler.

pub mod assemble;
pub mod bulk;
pub mod error;
pub mod extract;
pub mod parsers;
pub mod response;
pub mod sink;
pub mod source;
pub mod tokens;
pub mod types;

pub use assemble::{RawCandidate, assemble};
pub use bulk::parse_bulk_payload;
pub use error::{ExtractError, TokenError};
pub use extract::{
    DocumentKind, ExtractOptions, ExtractionResult, extract_document, extract_receipt,
    extract_from_text, extract_statement,
};
pub use parsers::{extract_from_lines, extract_from_sections};
pub use response::{ErrorBody, ImportSummary, respond};
pub use sink::{MemorySink, TransactionSink};
pub use source::{FallbackSource, PlainTextSource, TextSource};
pub use tokens::{parse_amount, parse_date};
pub use types::{AmountValue, ImportSource, TransactionRecord, TxnType};
