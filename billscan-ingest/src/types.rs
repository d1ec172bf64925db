use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxnType {
    #[default]
    Expense,
    Income,
}

/// Where a batch of records came from; picks the default description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportSource {
    Receipt,
    Statement,
    Bulk,
}

impl ImportSource {
    pub fn default_description(&self) -> &'static str {
        match self {
            ImportSource::Receipt => "Imported from uploaded receipt",
            ImportSource::Statement => "Imported from uploaded document",
            ImportSource::Bulk => "Imported from AI-Enhanced OCR",
        }
    }
}

pub const DEFAULT_CATEGORY: &str = "Unknown";

/// A strictly positive money amount, held at two decimal places.
///
/// Serialized as a string with exactly two fractional digits (`"1234.50"`).
/// The value is rounded before the sign check, so whatever is written back
/// out reads in again unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AmountValue(Decimal);

impl AmountValue {
    /// Rounds half away from zero to cents; `None` if the result is not positive.
    pub fn new(value: Decimal) -> Option<Self> {
        let cents = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        (cents > Decimal::ZERO).then_some(Self(cents))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for AmountValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for AmountValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AmountValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AmountVisitor;

        impl Visitor<'_> for AmountVisitor {
            type Value = AmountValue;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a positive decimal amount as string or number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<AmountValue, E> {
                let d = Decimal::from_str(v.trim()).map_err(E::custom)?;
                AmountValue::new(d).ok_or_else(|| E::custom("amount must be positive"))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<AmountValue, E> {
                // f64 Display is the shortest round-trip form, so 450.75 stays 450.75
                let d = Decimal::from_str(&v.to_string()).map_err(E::custom)?;
                AmountValue::new(d).ok_or_else(|| E::custom("amount must be positive"))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<AmountValue, E> {
                AmountValue::new(Decimal::from(v))
                    .ok_or_else(|| E::custom("amount must be positive"))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<AmountValue, E> {
                AmountValue::new(Decimal::from(v))
                    .ok_or_else(|| E::custom("amount must be positive"))
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}

/// Normalized output of both extraction paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(rename = "type")]
    pub kind: TxnType,
    pub amount: AmountValue,
    pub category: String,
    /// Serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(s: &str) -> AmountValue {
        AmountValue::new(Decimal::from_str(s).unwrap()).unwrap()
    }

    #[test]
    fn test_amount_rejects_zero() {
        assert!(AmountValue::new(Decimal::ZERO).is_none());
        assert!(AmountValue::new(Decimal::from_str("-3.10").unwrap()).is_none());
    }

    #[test]
    fn test_record_serializes_two_decimals() {
        let rec = TransactionRecord {
            kind: TxnType::Expense,
            amount: amount("1234.5"),
            category: "Groceries".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 12).unwrap(),
            description: "Big Bazaar".to_string(),
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["type"], "expense");
        assert_eq!(json["amount"], "1234.50");
        assert_eq!(json["date"], "2024-03-12");
    }

    #[test]
    fn test_amount_deserializes_from_number_or_string() {
        let a: AmountValue = serde_json::from_str("450.75").unwrap();
        let b: AmountValue = serde_json::from_str("\"450.75\"").unwrap();
        assert_eq!(a, b);
        assert!(serde_json::from_str::<AmountValue>("0").is_err());
    }

    #[test]
    fn test_amount_rounds_to_cents_before_sign_check() {
        assert!(AmountValue::new(Decimal::from_str("0.004").unwrap()).is_none());
        assert_eq!(amount("0.005").to_string(), "0.01");
        assert_eq!(amount("12.345").to_string(), "12.35");
        assert_eq!(amount("12.344").value(), Decimal::from_str("12.34").unwrap());

        let json = serde_json::to_value(amount("12.345")).unwrap();
        assert_eq!(json, "12.35");
    }

    #[test]
    fn test_record_survives_json_roundtrip() {
        let recs = vec![
            TransactionRecord {
                kind: TxnType::Income,
                amount: amount("12.345"),
                category: "Salary".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
                description: "April".to_string(),
            },
            TransactionRecord {
                kind: TxnType::Expense,
                amount: amount("0.005"),
                category: "Fees".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
                description: "Rounding".to_string(),
            },
        ];
        let json = serde_json::to_string(&recs).unwrap();
        let back: Vec<TransactionRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, recs);
        assert_eq!(serde_json::to_string(&back).unwrap(), json);
    }
}
