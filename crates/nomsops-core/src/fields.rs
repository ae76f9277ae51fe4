//! Field specifications: per-field cleaning and validation rules

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::CleanError;
use crate::types::{Choices, FieldValue};

static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^£?\d+(\.\d\d)?$").expect("amount pattern"));
static PRISONER_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]\d{4}[A-Za-z]{2}$").expect("prisoner number pattern"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern"));

/// How a field's raw string value is parsed and validated
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Free text, kept verbatim
    Text,
    /// One key of a static choice table
    Choice(Choices),
    /// A £ amount in pounds, normalized to a `1234.56` string
    Amount,
    /// An integer within an inclusive range
    BoundedInt { min: i64, max: i64 },
    /// A `YYYY-MM-DD` date (split submissions are merged before cleaning)
    Date,
    /// Pattern-checked prisoner number, uppercased
    PrisonerNumber,
    /// Bank sort code; separators are stripped
    SortCode,
    /// Email address
    Email,
    /// IPv4 or IPv6 address, canonicalized
    IpAddress,
}

/// A named filter field: label for descriptions, kind for cleaning
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        FieldSpec { name, label, kind }
    }

    /// Parse one submitted value; errors mean "treat as blank"
    pub fn clean(&self, raw: &str) -> Result<FieldValue, CleanError> {
        match self.kind {
            FieldKind::Text => Ok(FieldValue::text(raw)),
            FieldKind::Choice(choices) => {
                if choices.iter().any(|(key, _)| *key == raw) {
                    Ok(FieldValue::text(raw))
                } else {
                    Err(CleanError::InvalidChoice {
                        value: raw.to_string(),
                    })
                }
            }
            FieldKind::Amount => clean_amount(raw),
            FieldKind::BoundedInt { min, max } => {
                let value: i64 = raw.parse().map_err(|_| CleanError::InvalidNumber)?;
                if value < min || value > max {
                    return Err(CleanError::OutOfRange { value });
                }
                Ok(FieldValue::Int(value))
            }
            FieldKind::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(FieldValue::Date)
                .map_err(|_| CleanError::InvalidDate),
            FieldKind::PrisonerNumber => {
                if PRISONER_NUMBER_RE.is_match(raw) {
                    Ok(FieldValue::Text(raw.to_uppercase()))
                } else {
                    Err(CleanError::InvalidPrisonerNumber)
                }
            }
            FieldKind::SortCode => Ok(FieldValue::Text(
                raw.chars().filter(|c| *c != '-' && *c != ' ').collect(),
            )),
            FieldKind::Email => {
                if EMAIL_RE.is_match(raw) {
                    Ok(FieldValue::text(raw))
                } else {
                    Err(CleanError::InvalidEmail)
                }
            }
            FieldKind::IpAddress => raw
                .parse::<std::net::IpAddr>()
                .map(|ip| FieldValue::Text(ip.to_string()))
                .map_err(|_| CleanError::InvalidIpAddress),
        }
    }
}

/// Normalize a validated amount to pounds with two decimals, no £ sign
fn clean_amount(raw: &str) -> Result<FieldValue, CleanError> {
    if !AMOUNT_RE.is_match(raw) {
        return Err(CleanError::InvalidAmount);
    }
    let value = raw.trim_start_matches('£');
    let normalized = if value.contains('.') {
        value.to_string()
    } else {
        format!("{}.00", value)
    };
    Ok(FieldValue::Text(normalized))
}

/// Pence value of a cleaned amount string
pub fn amount_to_pence(cleaned: &str) -> i64 {
    cleaned.replace('.', "").parse().unwrap_or(0)
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PRISONS;

    fn spec(kind: FieldKind) -> FieldSpec {
        FieldSpec::new("field", "Field", kind)
    }

    #[test]
    fn test_amount_cleaning() {
        let amount = spec(FieldKind::Amount);
        assert_eq!(amount.clean("£25.00"), Ok(FieldValue::text("25.00")));
        assert_eq!(amount.clean("25.00"), Ok(FieldValue::text("25.00")));
        assert_eq!(amount.clean("£25"), Ok(FieldValue::text("25.00")));
        assert_eq!(amount.clean("25.0"), Err(CleanError::InvalidAmount));
        assert_eq!(amount.clean("twenty"), Err(CleanError::InvalidAmount));
        assert_eq!(amount.clean("-5.00"), Err(CleanError::InvalidAmount));
    }

    #[test]
    fn test_amount_to_pence() {
        assert_eq!(amount_to_pence("25.00"), 2500);
        assert_eq!(amount_to_pence("0.07"), 7);
        assert_eq!(amount_to_pence("100.00"), 10_000);
    }

    #[test]
    fn test_prisoner_number_cleaning() {
        let field = spec(FieldKind::PrisonerNumber);
        assert_eq!(field.clean("a1409ae"), Ok(FieldValue::text("A1409AE")));
        assert_eq!(field.clean("A1409AE"), Ok(FieldValue::text("A1409AE")));
        assert_eq!(
            field.clean("A1409A"),
            Err(CleanError::InvalidPrisonerNumber)
        );
        assert_eq!(
            field.clean("11409AE"),
            Err(CleanError::InvalidPrisonerNumber)
        );
    }

    #[test]
    fn test_choice_cleaning() {
        let field = spec(FieldKind::Choice(PRISONS));
        assert_eq!(field.clean("BXI"), Ok(FieldValue::text("BXI")));
        assert!(matches!(
            field.clean("XXX"),
            Err(CleanError::InvalidChoice { .. })
        ));
    }

    #[test]
    fn test_bounded_int_cleaning() {
        let field = spec(FieldKind::BoundedInt { min: 0, max: 99 });
        assert_eq!(field.clean("0"), Ok(FieldValue::Int(0)));
        assert_eq!(field.clean("99"), Ok(FieldValue::Int(99)));
        assert_eq!(field.clean("100"), Err(CleanError::OutOfRange { value: 100 }));
        assert_eq!(field.clean("x"), Err(CleanError::InvalidNumber));
    }

    #[test]
    fn test_date_cleaning() {
        let field = spec(FieldKind::Date);
        assert_eq!(
            field.clean("2018-02-13"),
            Ok(FieldValue::Date(
                NaiveDate::from_ymd_opt(2018, 2, 13).unwrap()
            ))
        );
        assert_eq!(field.clean("2018-02-30"), Err(CleanError::InvalidDate));
        assert_eq!(field.clean("13/02/2018"), Err(CleanError::InvalidDate));
    }

    #[test]
    fn test_sort_code_strips_separators() {
        let field = spec(FieldKind::SortCode);
        assert_eq!(field.clean("01-23-45"), Ok(FieldValue::text("012345")));
        assert_eq!(field.clean("01 23 45"), Ok(FieldValue::text("012345")));
    }

    #[test]
    fn test_email_and_ip_cleaning() {
        let email = spec(FieldKind::Email);
        assert_eq!(
            email.clean("mary@example.com"),
            Ok(FieldValue::text("mary@example.com"))
        );
        assert_eq!(email.clean("not-an-email"), Err(CleanError::InvalidEmail));

        let ip = spec(FieldKind::IpAddress);
        assert_eq!(
            ip.clean("151.101.16.144"),
            Ok(FieldValue::text("151.101.16.144"))
        );
        assert_eq!(ip.clean("151.101.16"), Err(CleanError::InvalidIpAddress));
    }
}
