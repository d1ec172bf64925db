//! Date token parser.
//!
//! Recognized shapes, tried in this order:
//!   12/3/2024  or 12/03/2024   day-first, slash separated
//!   12032024                   day-first, 8 contiguous digits
//!   2024-3-12                  year-first, hyphen separated
//!   a loose run of 6-8 digits  read as DDMMYYYY when exactly 8 digits
//!
//! The first rule whose pattern matches decides. If that rule cannot build a
//! real calendar date the token is rejected; later rules are not consulted.
//! So "31/02/2024" is invalid, and "010203" (6 digits) is invalid too.

use chrono::NaiveDate;
use regex::{Captures, Regex};
use std::sync::OnceLock;
use tracing::trace;

use crate::error::TokenError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRule {
    SlashDayFirst,
    CompactDayFirst,
    IsoYearFirst,
    LooseDigitRun,
}

impl DateRule {
    /// Priority order used by [`parse_date`].
    pub const ORDER: [DateRule; 4] = [
        DateRule::SlashDayFirst,
        DateRule::CompactDayFirst,
        DateRule::IsoYearFirst,
        DateRule::LooseDigitRun,
    ];

    fn build(&self, caps: &Captures<'_>) -> Option<NaiveDate> {
        match self {
            DateRule::SlashDayFirst | DateRule::CompactDayFirst => {
                ymd(&caps[3], &caps[2], &caps[1])
            }
            DateRule::IsoYearFirst => ymd(&caps[1], &caps[2], &caps[3]),
            DateRule::LooseDigitRun => {
                let digits: String = caps[0].chars().filter(|c| c.is_ascii_digit()).collect();
                if digits.len() != 8 {
                    return None;
                }
                ymd(&digits[4..8], &digits[2..4], &digits[0..2])
            }
        }
    }
}

/// The compiled rule patterns, built once on first use.
struct DatePatterns {
    slash: Regex,
    compact: Regex,
    iso: Regex,
    digit_run: Regex,
}

impl DatePatterns {
    fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            slash: Regex::new(r"([0-9]{1,2})/([0-9]{1,2})/([0-9]{4})")?,
            compact: Regex::new(r"([0-9]{2})([0-9]{2})([0-9]{4})")?,
            iso: Regex::new(r"([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})")?,
            digit_run: Regex::new(r"[0-9]{6,8}")?,
        })
    }

    fn get() -> Result<&'static Self, TokenError> {
        static PATTERNS: OnceLock<DatePatterns> = OnceLock::new();
        if let Some(p) = PATTERNS.get() {
            return Ok(p);
        }
        let built = Self::new().map_err(|e| TokenError::Pattern(e.to_string()))?;
        Ok(PATTERNS.get_or_init(|| built))
    }

    fn for_rule(&self, rule: DateRule) -> &Regex {
        match rule {
            DateRule::SlashDayFirst => &self.slash,
            DateRule::CompactDayFirst => &self.compact,
            DateRule::IsoYearFirst => &self.iso,
            DateRule::LooseDigitRun => &self.digit_run,
        }
    }
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// A substring that matched one of the date rules, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateCandidate<'a> {
    pub text: &'a str,
    pub rule: DateRule,
}

impl DateCandidate<'_> {
    pub fn resolve(&self) -> Result<NaiveDate, TokenError> {
        let caps = DatePatterns::get()?
            .for_rule(self.rule)
            .captures(self.text)
            .ok_or_else(|| TokenError::InvalidDate(self.text.to_string()))?;
        self.rule
            .build(&caps)
            .ok_or_else(|| TokenError::InvalidDate(self.text.to_string()))
    }
}

/// Find the first rule whose pattern occurs in `s`, and the matched text.
pub fn classify_date(s: &str) -> Result<Option<DateCandidate<'_>>, TokenError> {
    let patterns = DatePatterns::get()?;
    Ok(DateRule::ORDER.iter().find_map(|rule| {
        patterns.for_rule(*rule).find(s).map(|m| DateCandidate {
            text: m.as_str(),
            rule: *rule,
        })
    }))
}

/// Parse a date token into a calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate, TokenError> {
    let Some(candidate) = classify_date(s)? else {
        trace!(input = s, "no date rule matched");
        return Err(TokenError::InvalidDate(s.to_string()));
    };

    let resolved = candidate.resolve().map_err(|e| match e {
        TokenError::InvalidDate(_) => TokenError::InvalidDate(s.to_string()),
        other => other,
    });
    trace!(input = s, rule = ?candidate.rule, ok = resolved.is_ok(), "date rule applied");
    resolved
}
