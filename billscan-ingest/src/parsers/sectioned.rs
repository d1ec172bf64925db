//! Sectioned receipt parser (OCR text)
//!
//! Receipts laid out as label-headed columns come out of OCR one cell per line:
//!   Date
//!   12/03/2024
//!   13/03/2024
//!   Description
//!   Big Bazaar
//!   Metro card
//!   Category
//!   Groceries
//!   Travel
//!   Amount
//!   ₹450.75
//!   ₹40
//!
//! Each column is collected separately and the columns are zipped by position.

use tracing::debug;

use crate::assemble::{RawCandidate, assemble};
use crate::tokens::{parse_amount, parse_date};
use crate::types::{ImportSource, TransactionRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Dates,
    Descriptions,
    Categories,
    Amounts,
}

impl Section {
    fn from_header(line: &str) -> Option<Section> {
        match line.to_lowercase().as_str() {
            "date" => Some(Section::Dates),
            "description" => Some(Section::Descriptions),
            "category" => Some(Section::Categories),
            "amount" => Some(Section::Amounts),
            _ => None,
        }
    }
}

/// The four columns collected from one receipt, in document order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Columns {
    pub dates: Vec<String>,
    pub descriptions: Vec<String>,
    pub categories: Vec<String>,
    pub amounts: Vec<String>,
}

/// Single pass over the lines, appending each to the current section.
///
/// Date cells that do not parse and amount cells that are not positive never
/// enter their column.
pub fn collect_columns(text: &str) -> Columns {
    let mut section = Section::None;
    let mut cols = Columns::default();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(next) = Section::from_header(line) {
            section = next;
            continue;
        }

        match section {
            Section::None => {}
            Section::Dates => {
                if parse_date(line).is_ok() {
                    cols.dates.push(line.to_string());
                }
            }
            Section::Descriptions => cols.descriptions.push(line.to_string()),
            Section::Categories => cols.categories.push(line.to_string()),
            Section::Amounts => {
                if parse_amount(line).is_ok() {
                    cols.amounts.push(line.to_string());
                }
            }
        }
    }

    cols
}

/// Pair the i-th entry of every column, up to the shortest column.
///
/// Nothing checks that the columns really line up in the source document: a
/// cell OCR missed in one column shifts every later row of that column, and
/// the resulting records silently mix fields from different rows.
pub fn zip_columns(cols: Columns) -> Vec<RawCandidate> {
    let Columns {
        dates,
        descriptions,
        categories,
        amounts,
    } = cols;

    dates
        .into_iter()
        .zip(descriptions)
        .zip(categories)
        .zip(amounts)
        .map(|(((date, description), category), amount)| {
            RawCandidate::new(date, amount)
                .with_category(category)
                .with_description(description)
        })
        .collect()
}

/// Parse label-sectioned receipt text into transactions.
///
/// Returns an empty list when any column is empty.
pub fn extract_from_sections(text: &str) -> Vec<TransactionRecord> {
    let cols = collect_columns(text);
    debug!(
        dates = cols.dates.len(),
        descriptions = cols.descriptions.len(),
        categories = cols.categories.len(),
        amounts = cols.amounts.len(),
        "receipt columns collected"
    );

    assemble(zip_columns(cols), ImportSource::Receipt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_sectioned_basic() {
        let text = r#"
Date
12/03/2024
13/03/2024
Description
Big Bazaar
Metro card
Category
Groceries
Travel
Amount
₹450.75
₹40
"#;

        let txns = extract_from_sections(text);
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].date, NaiveDate::from_ymd_opt(2024, 3, 12).unwrap());
        assert_eq!(txns[0].description, "Big Bazaar");
        assert_eq!(txns[0].category, "Groceries");
        assert_eq!(txns[0].amount.to_string(), "450.75");
        assert_eq!(txns[1].category, "Travel");
        assert_eq!(txns[1].amount.to_string(), "40.00");
    }

    #[test]
    fn test_shortest_column_bounds_zip() {
        let text = "DATE\n01/01/2024\n02/01/2024\n03/01/2024\n\
                    Description\nA\nB\nC\n\
                    category\nx\ny\nz\n\
                    Amount\n10\n20\n";

        let txns = extract_from_sections(text);
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].description, "A");
        assert_eq!(txns[1].description, "B");
        assert_eq!(txns[1].amount.to_string(), "20.00");
    }

    #[test]
    fn test_lines_before_first_header_ignored() {
        let text = "SuperMart\nThank you\n12/12/2024\nDate\n12/12/2024\nDescription\nMilk\nCategory\nDairy\nAmount\n55";
        let cols = collect_columns(text);
        assert_eq!(cols.dates, vec!["12/12/2024"]);
        assert_eq!(extract_from_sections(text).len(), 1);
    }

    #[test]
    fn test_invalid_cells_never_enter_columns() {
        let text = "Date\n31/02/2024\nnot a date\n01/03/2024\nAmount\n₹0.00\nTotal\n₹15";
        let cols = collect_columns(text);
        assert_eq!(cols.dates, vec!["01/03/2024"]);
        assert_eq!(cols.amounts, vec!["₹15"]);
    }

    #[test]
    fn test_misaligned_columns_pair_by_position() {
        // OCR lost the first description; the remaining ones shift up a row.
        let text = "Date\n01/01/2024\n02/01/2024\nDescription\nSecond shop\n\
                    Category\nFood\nFuel\nAmount\n100\n200";
        let txns = extract_from_sections(text);
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].description, "Second shop");
        assert_eq!(txns[0].category, "Food");
    }

    #[test]
    fn test_empty_column_yields_nothing() {
        let text = "Date\n01/01/2024\nDescription\nA\nAmount\n10";
        assert!(extract_from_sections(text).is_empty());
        assert!(extract_from_sections("").is_empty());
    }
}
