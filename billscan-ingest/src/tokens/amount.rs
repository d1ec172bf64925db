//! Amount token parser.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::TokenError;
use crate::types::AmountValue;

/// Parse a currency-formatted token such as `"₹1,234.50"`.
///
/// Everything except ASCII digits and `.` is discarded, then the longest
/// leading decimal number is read (`"1.2.3"` reads as `1.2`) and rounded to
/// cents. Digit-less input and anything that rounds to zero are rejected:
/// zero rows are headers, totals or blanks.
pub fn parse_amount(s: &str) -> Result<AmountValue, TokenError> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    leading_decimal(&cleaned)
        .and_then(AmountValue::new)
        .ok_or_else(|| TokenError::InvalidAmount(s.to_string()))
}

fn leading_decimal(s: &str) -> Option<Decimal> {
    let int_len = s.bytes().take_while(u8::is_ascii_digit).count();
    let mut end = int_len;
    let mut frac_len = 0;
    if s[end..].starts_with('.') {
        frac_len = s[end + 1..].bytes().take_while(u8::is_ascii_digit).count();
        if frac_len > 0 {
            end += 1 + frac_len;
        }
    }
    if int_len == 0 && frac_len == 0 {
        return None;
    }

    // leading zero so ".75" parses
    Decimal::from_str(&format!("0{}", &s[..end])).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amt(s: &str) -> String {
        parse_amount(s).unwrap().to_string()
    }

    #[test]
    fn test_strips_symbols_and_separators() {
        assert_eq!(amt("₹1,234.50"), "1234.50");
        assert_eq!(amt("Rs 450"), "450.00");
        assert_eq!(amt("$ 12.3"), "12.30");
    }

    #[test]
    fn test_zero_is_rejected() {
        assert_eq!(
            parse_amount("₹0.00"),
            Err(TokenError::InvalidAmount("₹0.00".into()))
        );
        assert!(parse_amount("0").is_err());
        // rounds to 0.00 at cent precision
        assert_eq!(
            parse_amount("₹0.004"),
            Err(TokenError::InvalidAmount("₹0.004".into()))
        );
        assert_eq!(amt("0.006"), "0.01");
    }

    #[test]
    fn test_no_digits_is_rejected() {
        assert!(parse_amount("").is_err());
        assert!(parse_amount("Total").is_err());
        assert!(parse_amount("...").is_err());
    }

    #[test]
    fn test_reads_leading_number_only() {
        assert_eq!(amt("1.2.3"), "1.20");
        assert_eq!(amt("12."), "12.00");
        assert_eq!(amt(".75"), "0.75");
    }

    #[test]
    fn test_minus_sign_is_stripped() {
        assert_eq!(amt("-45.10"), "45.10");
    }
}
