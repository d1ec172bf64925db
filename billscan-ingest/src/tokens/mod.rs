//! Shared date and amount token parsers.

pub mod amount;
pub mod date;

pub use amount::parse_amount;
pub use date::{DateCandidate, DateRule, classify_date, parse_date};
