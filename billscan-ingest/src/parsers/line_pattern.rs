//! Statement line parser (PDF/OCR text)
//!
//! Expected transaction rows after text extraction:
//!   12/03/2024   Groceries   Big Bazaar        ₹450.75
//!   13/03/2024   Travel                        ₹40
//!
//! Extraction often loses the line breaks, so the grammar is run over the
//! whole text rather than line by line. When that finds nothing, the text is
//! cut into one pseudo-line per date and each is matched on its own.

use regex::{Captures, Regex};
use tracing::debug;

use crate::assemble::{RawCandidate, assemble};
use crate::error::{ExtractError, Result};
use crate::types::{ImportSource, TransactionRecord};

pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// Characters kept after each date when re-segmenting.
pub const DEFAULT_FALLBACK_WINDOW: usize = 50;

const DATE_PATTERN: &str = r"[0-9]{1,2}/[0-9]{1,2}/[0-9]{4}";

/// `date  category  [description]  <symbol>amount`
#[derive(Debug, Clone)]
pub struct LineGrammar {
    line: Regex,
    date: Regex,
}

impl LineGrammar {
    pub fn new(currency_symbol: &str) -> Result<Self> {
        let line = Regex::new(&format!(
            concat!(
                r"({date})\s+",
                r"(\S[^\r\n]*?)",
                r"(?:\s+(\S[^\r\n]*?))?",
                r"\s+{symbol}([0-9]+)",
            ),
            date = DATE_PATTERN,
            symbol = regex::escape(currency_symbol),
        ))?;
        let date = Regex::new(DATE_PATTERN)?;
        Ok(Self { line, date })
    }

    /// First match at or after byte offset `start`, with the byte offset
    /// where the match (including any decimal part) ends.
    fn match_at(&self, text: &str, start: usize) -> Option<(RawCandidate, usize)> {
        let caps = self.line.captures_at(text, start)?;
        lift(text, &caps)
    }

    /// Every non-overlapping match, left to right.
    pub fn match_all(&self, text: &str) -> Vec<RawCandidate> {
        let mut out = Vec::new();
        let mut pos = 0;
        while let Some((candidate, end)) = self.match_at(text, pos) {
            out.push(candidate);
            pos = end;
        }
        out
    }

    pub fn match_first(&self, text: &str) -> Option<RawCandidate> {
        self.match_at(text, 0).map(|(candidate, _)| candidate)
    }
}

/// Build a candidate from a grammar match.
///
/// The amount is `digits.dd` when exactly two decimals follow and no third
/// digit comes after them; otherwise only the integer digits are taken.
fn lift(text: &str, caps: &Captures<'_>) -> Option<(RawCandidate, usize)> {
    let int_part = caps.get(4)?;
    let mut end = int_part.end();

    let rest = text[end..].as_bytes();
    let two_decimals = rest.len() >= 3
        && rest[0] == b'.'
        && rest[1].is_ascii_digit()
        && rest[2].is_ascii_digit()
        && !rest.get(3).is_some_and(u8::is_ascii_digit);
    if two_decimals {
        end += 3;
    }

    let mut candidate =
        RawCandidate::new(&caps[1], &text[int_part.start()..end]).with_category(caps[2].trim());
    if let Some(desc) = caps.get(3) {
        candidate = candidate.with_description(desc.as_str().trim());
    }
    Some((candidate, end))
}

/// Result of one matching strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TierOutcome {
    Matched(Vec<RawCandidate>),
    NoMatches,
}

impl TierOutcome {
    fn from_candidates(candidates: Vec<RawCandidate>) -> Self {
        if candidates.is_empty() {
            TierOutcome::NoMatches
        } else {
            TierOutcome::Matched(candidates)
        }
    }
}

/// Tier 1: the grammar over the full text.
pub fn primary_tier(grammar: &LineGrammar, text: &str) -> TierOutcome {
    TierOutcome::from_candidates(grammar.match_all(text))
}

/// Cut the text into one pseudo-line per date occurrence.
///
/// Each segment runs from the end of the previous date to `window` characters
/// past the end of this one; whatever follows the last date is a final
/// segment. Segments are trimmed and their line breaks joined with spaces.
pub fn resegment(grammar: &LineGrammar, text: &str, window: usize) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = 0;

    for m in grammar.date.find_iter(text) {
        let stop = advance_chars(text, m.end(), window);
        push_segment(&mut segments, &text[current..stop]);
        current = m.end();
    }
    push_segment(&mut segments, &text[current..]);

    segments
}

fn advance_chars(text: &str, from: usize, n: usize) -> usize {
    text[from..]
        .char_indices()
        .nth(n)
        .map_or(text.len(), |(i, _)| from + i)
}

fn push_segment(segments: &mut Vec<String>, raw: &str) {
    let joined = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if !joined.is_empty() {
        segments.push(joined);
    }
}

/// Tier 2: re-segment around each date and match every segment once.
///
/// Fails with [`ExtractError::NoDatesFound`] when the text holds no date at all.
pub fn fallback_tier(grammar: &LineGrammar, text: &str, window: usize) -> Result<TierOutcome> {
    if !grammar.date.is_match(text) {
        return Err(ExtractError::NoDatesFound);
    }

    let segments = resegment(grammar, text, window);
    debug!(segments = segments.len(), "re-segmented statement text");

    let candidates = segments
        .iter()
        .filter_map(|seg| {
            let found = grammar.match_first(seg);
            if found.is_none() {
                debug!(segment = %seg, "no transaction in segment");
            }
            found
        })
        .collect();

    Ok(TierOutcome::from_candidates(candidates))
}

/// Parse statement text into transactions with an explicit grammar and window.
pub fn extract_from_lines_with(
    grammar: &LineGrammar,
    text: &str,
    window: usize,
) -> Result<Vec<TransactionRecord>> {
    let candidates = match primary_tier(grammar, text) {
        TierOutcome::Matched(candidates) => candidates,
        TierOutcome::NoMatches => {
            debug!("no full line matches, re-segmenting by date");
            match fallback_tier(grammar, text, window)? {
                TierOutcome::Matched(candidates) => candidates,
                TierOutcome::NoMatches => Vec::new(),
            }
        }
    };

    Ok(assemble(candidates, ImportSource::Statement))
}

/// Parse statement text using the `₹` grammar and a 50-character window.
pub fn extract_from_lines(text: &str) -> Result<Vec<TransactionRecord>> {
    let grammar = LineGrammar::new(DEFAULT_CURRENCY_SYMBOL)?;
    extract_from_lines_with(&grammar, text, DEFAULT_FALLBACK_WINDOW)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_single_line() {
        let txns = extract_from_lines("12/03/2024 Groceries Big Bazaar ₹450.75").unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].date, NaiveDate::from_ymd_opt(2024, 3, 12).unwrap());
        assert_eq!(txns[0].category, "Groceries");
        assert_eq!(txns[0].description, "Big Bazaar");
        assert_eq!(txns[0].amount.to_string(), "450.75");
    }

    #[test]
    fn test_single_token_goes_to_category() {
        let txns = extract_from_lines("13/03/2024 Travel ₹40").unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].category, "Travel");
        assert_eq!(txns[0].description, "Imported from uploaded document");
        assert_eq!(txns[0].amount.to_string(), "40.00");
    }

    #[test]
    fn test_global_match_without_line_breaks() {
        let text = "01/03/2024 Dining Pizza Hut ₹250.00 05/03/2024 Travel Metro ₹40 \
                    07/03/2024 Bills Electricity ₹1200.5";
        let txns = extract_from_lines(text).unwrap();
        assert_eq!(txns.len(), 3);
        assert_eq!(txns[0].description, "Pizza Hut");
        assert_eq!(txns[1].category, "Travel");
        assert_eq!(txns[1].description, "Metro");
        // one decimal digit is not a two-decimal amount; integer part only
        assert_eq!(txns[2].amount.to_string(), "1200.00");
    }

    #[test]
    fn test_third_decimal_digit_not_swallowed() {
        let txns = extract_from_lines("01/01/2024 Fees ₹12.345").unwrap();
        assert_eq!(txns[0].amount.to_string(), "12.00");
    }

    #[test]
    fn test_fallback_recovers_fragmented_rows() {
        let text = "Statement\n01/03/2024 Dining\nPizza\nHut ₹250.00\n05/03/2024 Travel\nMetro\ncard ₹40\n";
        let grammar = LineGrammar::new(DEFAULT_CURRENCY_SYMBOL).unwrap();
        assert_eq!(primary_tier(&grammar, text), TierOutcome::NoMatches);

        let txns = extract_from_lines(text).unwrap();
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].category, "Dining");
        assert_eq!(txns[0].description, "Pizza Hut");
        assert_eq!(txns[0].amount.to_string(), "250.00");
        assert_eq!(txns[1].date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(txns[1].description, "Metro card");
        assert_eq!(txns[1].amount.to_string(), "40.00");
    }

    #[test]
    fn test_resegment_windows() {
        let grammar = LineGrammar::new(DEFAULT_CURRENCY_SYMBOL).unwrap();
        let text = "a 01/01/2024 xyz\nb 02/01/2024 tail";
        let segs = resegment(&grammar, text, 4);
        assert_eq!(segs, vec!["a 01/01/2024 xyz", "xyz b 02/01/2024 tai", "tail"]);
    }

    #[test]
    fn test_fallback_ignores_amount_past_window() {
        let text = "01/03/2024 Dining\nPizza\nHut ₹250.00\n05/03/2024 Travel\nMetro\n\
                    Ref 0000000000 branch transfer note for this month pending\ncard ₹40\n";
        let grammar = LineGrammar::new(DEFAULT_CURRENCY_SYMBOL).unwrap();
        assert_eq!(primary_tier(&grammar, text), TierOutcome::NoMatches);

        // ₹40 sits more than 50 characters past its date
        let txns = extract_from_lines(text).unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(txns[0].description, "Pizza Hut");

        let wide = extract_from_lines_with(&grammar, text, 200).unwrap();
        assert_eq!(wide.len(), 2);
        assert_eq!(wide[1].category, "Travel");
        assert_eq!(wide[1].amount.to_string(), "40.00");
    }

    #[test]
    fn test_no_dates_is_distinct_failure() {
        let err = extract_from_lines("Opening balance ₹500\nNothing else").unwrap_err();
        assert!(matches!(err, ExtractError::NoDatesFound));
    }

    #[test]
    fn test_dates_without_amounts_yield_empty() {
        let txns = extract_from_lines("Period 01/03/2024\nto 31/03/2024\n").unwrap();
        assert!(txns.is_empty());
    }

    #[test]
    fn test_invalid_matches_dropped() {
        let text = "31/02/2024 Bad ₹10\n01/03/2024 Zero ₹0\n02/03/2024 Good ₹5.50";
        let txns = extract_from_lines(text).unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].category, "Good");
    }

    #[test]
    fn test_custom_currency_symbol() {
        let grammar = LineGrammar::new("$").unwrap();
        let txns = extract_from_lines_with(&grammar, "04/07/2024 Fuel Shell $60.10", 50).unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].amount.to_string(), "60.10");
        assert!(extract_from_lines("04/07/2024 Fuel Shell $60.10").unwrap().is_empty());
    }
}
