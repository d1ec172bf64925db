//! Text-to-candidate parsers for the two supported document layouts.

pub mod line_pattern;
pub mod sectioned;

pub use line_pattern::{LineGrammar, TierOutcome, extract_from_lines, extract_from_lines_with};
pub use sectioned::extract_from_sections;
