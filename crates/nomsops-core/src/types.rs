//! Scalar field values and the static choice tables shared by the forms

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A single scalar value held by a record field or a cleaned query field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Free text, choice keys, normalized amounts
    Text(String),
    /// Amounts in pence, counts, totals
    Int(i64),
    /// Calendar date (date-range bounds)
    Date(NaiveDate),
    /// Timestamp fields such as a credit's received time
    DateTime(NaiveDateTime),
}

impl FieldValue {
    pub fn text(value: impl AsRef<str>) -> Self {
        FieldValue::Text(value.as_ref().to_string())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Calendar date of the value, collapsing timestamps to their date
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(date) => Some(*date),
            FieldValue::DateTime(datetime) => Some(datetime.date()),
            _ => None,
        }
    }

    /// Natural order within a variant; mixed variants compare equal so a
    /// stable sort leaves them in their original positions
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Int(a), FieldValue::Int(b)) => a.cmp(b),
            (FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
            (FieldValue::DateTime(a), FieldValue::DateTime(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }

    /// Render the value the way it appears in a query string
    pub fn query_value(&self) -> String {
        match self {
            FieldValue::Text(value) => value.clone(),
            FieldValue::Int(value) => value.to_string(),
            FieldValue::Date(date) => date.format("%Y-%m-%d").to_string(),
            FieldValue::DateTime(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.query_value())
    }
}

// ==================== Choice Tables ====================

/// Choice table type: (submitted key, human label)
pub type Choices = &'static [(&'static str, &'static str)];

/// Prisons known to the prototype dataset
pub const PRISONS: Choices = &[("BXI", "HMP Brixton"), ("LEI", "HMP Leeds")];

/// Credit lifecycle statuses
pub const CREDIT_STATUSES: Choices = &[("pending", "Pending"), ("credited", "Credited")];

/// How a credit was paid in
pub const SOURCES: Choices = &[("bank_transfer", "Bank transfer"), ("online", "Debit card")];

/// How a disbursement is sent out
pub const METHODS: Choices = &[("bank_transfer", "Bank transfer"), ("cheque", "Cheque")];

/// Disbursement lifecycle statuses
pub const DISBURSEMENT_STATUSES: Choices = &[
    ("entered", "Entered"),
    ("confirmed", "Confirmed"),
    ("sent", "Sent"),
];

/// Look up the human label for a choice key, falling back to the key itself
pub fn choice_label(choices: Choices, key: &str) -> String {
    choices
        .iter()
        .find(|(choice, _)| *choice == key)
        .map(|(_, label)| (*label).to_string())
        .unwrap_or_else(|| key.to_string())
}

// ==================== Amount Patterns ====================

/// Shapes of suspicious amounts selectable in the amount filter group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountPattern {
    /// Not a whole number of pounds
    NotIntegral,
    /// Not a multiple of £5
    NotMultiple5,
    /// Not a multiple of £10
    NotMultiple10,
    /// £100 or more
    Gte100,
    /// An exact amount, supplied separately
    Exact,
    /// An exact number of pence, supplied separately
    Pence,
}

/// Amount pattern choices in display order
pub const AMOUNT_PATTERNS: Choices = &[
    ("not_integral", "Not a whole number"),
    ("not_multiple_5", "Not a multiple of £5"),
    ("not_multiple_10", "Not a multiple of £10"),
    ("gte_100", "£100 or more"),
    ("exact", "Exact amount"),
    ("pence", "Exact number of pence"),
];

impl AmountPattern {
    pub fn label(self) -> &'static str {
        match self {
            AmountPattern::NotIntegral => "Not a whole number",
            AmountPattern::NotMultiple5 => "Not a multiple of £5",
            AmountPattern::NotMultiple10 => "Not a multiple of £10",
            AmountPattern::Gte100 => "£100 or more",
            AmountPattern::Exact => "Exact amount",
            AmountPattern::Pence => "Exact number of pence",
        }
    }
}

impl std::str::FromStr for AmountPattern {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_integral" => Ok(AmountPattern::NotIntegral),
            "not_multiple_5" => Ok(AmountPattern::NotMultiple5),
            "not_multiple_10" => Ok(AmountPattern::NotMultiple10),
            "gte_100" => Ok(AmountPattern::Gte100),
            "exact" => Ok(AmountPattern::Exact),
            "pence" => Ok(AmountPattern::Pence),
            _ => Err(format!("Invalid amount pattern: {}", s)),
        }
    }
}

impl std::fmt::Display for AmountPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AmountPattern::NotIntegral => write!(f, "not_integral"),
            AmountPattern::NotMultiple5 => write!(f, "not_multiple_5"),
            AmountPattern::NotMultiple10 => write!(f, "not_multiple_10"),
            AmountPattern::Gte100 => write!(f, "gte_100"),
            AmountPattern::Exact => write!(f, "exact"),
            AmountPattern::Pence => write!(f, "pence"),
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_field_value_compare_same_variant() {
        let a = FieldValue::Int(100);
        let b = FieldValue::Int(250);
        assert_eq!(a.compare(&b), Ordering::Less);
        assert_eq!(b.compare(&a), Ordering::Greater);
        assert_eq!(a.compare(&a.clone()), Ordering::Equal);

        let x = FieldValue::text("ALPHA");
        let y = FieldValue::text("BRAVO");
        assert_eq!(x.compare(&y), Ordering::Less);
    }

    #[test]
    fn test_field_value_compare_mixed_variants() {
        let a = FieldValue::Int(100);
        let b = FieldValue::text("100");
        assert_eq!(a.compare(&b), Ordering::Equal);
    }

    #[test]
    fn test_field_value_query_rendering() {
        let date = FieldValue::Date(NaiveDate::from_ymd_opt(2018, 2, 13).unwrap());
        assert_eq!(date.query_value(), "2018-02-13");
        assert_eq!(FieldValue::Int(25).query_value(), "25");
        assert_eq!(FieldValue::text("pending").query_value(), "pending");
    }

    #[test]
    fn test_datetime_collapses_to_date() {
        let datetime = NaiveDate::from_ymd_opt(2018, 2, 13)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let value = FieldValue::DateTime(datetime);
        assert_eq!(value.as_date(), NaiveDate::from_ymd_opt(2018, 2, 13));
    }

    #[test]
    fn test_field_value_serializes_as_bare_scalar() {
        let date = FieldValue::Date(NaiveDate::from_ymd_opt(2018, 2, 13).unwrap());
        assert_eq!(
            serde_json::to_value(&date).unwrap(),
            serde_json::json!("2018-02-13")
        );
        assert_eq!(
            serde_json::to_value(FieldValue::Int(2500)).unwrap(),
            serde_json::json!(2500)
        );
    }

    #[test]
    fn test_choice_label_lookup() {
        assert_eq!(choice_label(PRISONS, "BXI"), "HMP Brixton");
        assert_eq!(choice_label(SOURCES, "online"), "Debit card");
        assert_eq!(choice_label(PRISONS, "XXX"), "XXX");
    }

    #[test]
    fn test_amount_pattern_round_trip() {
        for (key, label) in AMOUNT_PATTERNS {
            let pattern = AmountPattern::from_str(key).unwrap();
            assert_eq!(pattern.to_string(), *key);
            assert_eq!(pattern.label(), *label);
        }
        assert!(AmountPattern::from_str("nonsense").is_err());
    }
}
