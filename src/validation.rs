//! Field validation
//!
//! Checks raw text input (email, password, weight, height) before it is parsed
//! or stored. Checks run in a fixed order (presence, format, parse, range) and
//! stop at the first failure, whose message is returned. Nothing here panics;
//! an invalid field is an ordinary return value.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use crate::bmi::{HeightUnit, HeightValue, WeightUnit, WeightValue};

// ============================================================================
// Messages
// ============================================================================

pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Please enter a valid email address";
pub const PASSWORD_REQUIRED: &str = "Password is required";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters";
pub const PASSWORD_NEEDS_LETTER: &str = "Password must contain at least one letter";
pub const PASSWORD_NEEDS_NUMBER: &str = "Password must contain at least one number";
pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";
pub const WEIGHT_REQUIRED: &str = "Weight is required";
pub const WEIGHT_INVALID: &str = "Invalid weight value";
pub const WEIGHT_RANGE_KG: &str = "Weight must be between 1 and 500 kg";
pub const WEIGHT_RANGE_LBS: &str = "Weight must be between 2.2 and 1100 lbs";
pub const HEIGHT_REQUIRED: &str = "Height is required";
pub const HEIGHT_INVALID: &str = "Invalid height value";
pub const HEIGHT_RANGE_CM: &str = "Height must be between 50 and 250 cm";
pub const HEIGHT_RANGE_INCHES: &str = "Height must be between 20 and 100 inches";
pub const NUMERIC_INVALID: &str = "Please enter a valid numeric value";

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Default format for `is_valid_date`
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Patterns
// ============================================================================

/// Whole-string email match: local@domain.tld, tld of 2-64 letters
static EMAIL_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^[A-Z0-9a-z._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,64}$").ok()
});

/// Any Unicode decimal digit (general category Nd), not just ASCII
static DECIMAL_DIGIT: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\p{Nd}").ok());

/// Digits with at most one decimal point (the empty string matches too)
static NUMERIC_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[0-9]*\.?[0-9]*$").ok());

// ============================================================================
// Outcome
// ============================================================================

/// Result of validating a single field.
///
/// `message` is present exactly when the field is invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    is_valid: bool,
    message: Option<String>,
}

impl ValidationOutcome {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: Some(message.into()),
        }
    }

    /// Valid when `message` is `None`
    pub fn from_message(message: Option<&str>) -> Self {
        match message {
            Some(m) => Self::invalid(m),
            None => Self::valid(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// `Err(message)` for an invalid outcome
    pub fn into_result(self) -> Result<(), String> {
        match self.message {
            Some(m) => Err(m),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Email
// ============================================================================

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(email))
}

pub fn email_validation_message(email: &str) -> Option<&'static str> {
    if email.is_empty() {
        return Some(EMAIL_REQUIRED);
    }
    if !is_valid_email(email) {
        return Some(EMAIL_INVALID);
    }
    None
}

// ============================================================================
// Password
// ============================================================================

fn has_letter(password: &str) -> bool {
    password.chars().any(char::is_alphabetic)
}

fn has_digit(password: &str) -> bool {
    DECIMAL_DIGIT
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(password))
}

/// At least 8 characters with at least one letter and one digit
pub fn is_valid_password(password: &str) -> bool {
    password_validation_message(password).is_none()
}

pub fn password_validation_message(password: &str) -> Option<&'static str> {
    if password.is_empty() {
        return Some(PASSWORD_REQUIRED);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Some(PASSWORD_TOO_SHORT);
    }
    if !has_letter(password) {
        return Some(PASSWORD_NEEDS_LETTER);
    }
    if !has_digit(password) {
        return Some(PASSWORD_NEEDS_NUMBER);
    }
    None
}

/// Equal and non-empty. Two empty strings never match.
pub fn passwords_match(password: &str, confirm_password: &str) -> bool {
    password == confirm_password && !password.is_empty()
}

// ============================================================================
// Numeric fields
// ============================================================================

pub fn is_valid_numeric(text: &str) -> bool {
    NUMERIC_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(text))
}

fn check_weight(weight: &str, unit: WeightUnit) -> Result<f64, &'static str> {
    if weight.is_empty() {
        return Err(WEIGHT_REQUIRED);
    }
    if !is_valid_numeric(weight) {
        return Err(NUMERIC_INVALID);
    }
    // The pattern admits a lone "." which does not parse
    let value: f64 = weight.parse().map_err(|_| WEIGHT_INVALID)?;

    let (min, max, message) = match unit {
        WeightUnit::Kilograms => (1.0, 500.0, WEIGHT_RANGE_KG),
        WeightUnit::Pounds => (2.2, 1100.0, WEIGHT_RANGE_LBS),
    };
    if value < min || value > max {
        return Err(message);
    }
    Ok(value)
}

fn check_height(height: &str, unit: HeightUnit) -> Result<f64, &'static str> {
    if height.is_empty() {
        return Err(HEIGHT_REQUIRED);
    }
    if !is_valid_numeric(height) {
        return Err(NUMERIC_INVALID);
    }
    let value: f64 = height.parse().map_err(|_| HEIGHT_INVALID)?;

    let (min, max, message) = match unit {
        HeightUnit::Centimeters => (50.0, 250.0, HEIGHT_RANGE_CM),
        HeightUnit::Inches => (20.0, 100.0, HEIGHT_RANGE_INCHES),
    };
    if value < min || value > max {
        return Err(message);
    }
    Ok(value)
}

pub fn is_valid_weight(weight: &str, unit: WeightUnit) -> ValidationOutcome {
    match check_weight(weight, unit) {
        Ok(_) => ValidationOutcome::valid(),
        Err(message) => ValidationOutcome::invalid(message),
    }
}

pub fn is_valid_height(height: &str, unit: HeightUnit) -> ValidationOutcome {
    match check_height(height, unit) {
        Ok(_) => ValidationOutcome::valid(),
        Err(message) => ValidationOutcome::invalid(message),
    }
}

/// Validate then parse a weight field
pub fn parse_weight(weight: &str, unit: WeightUnit) -> Result<WeightValue, &'static str> {
    check_weight(weight, unit).map(|value| WeightValue::new(value, unit))
}

/// Validate then parse a height field
pub fn parse_height(height: &str, unit: HeightUnit) -> Result<HeightValue, &'static str> {
    check_height(height, unit).map(|value| HeightValue::new(value, unit))
}

// ============================================================================
// General fields
// ============================================================================

/// Fails with "<field_name> is required" when `text` is blank
pub fn is_not_empty(text: &str, field_name: &str) -> ValidationOutcome {
    if text.trim().is_empty() {
        return ValidationOutcome::invalid(format!("{} is required", field_name));
    }
    ValidationOutcome::valid()
}

/// Strict calendar-date parse using a chrono format string
pub fn is_valid_date(date: &str, format: &str) -> bool {
    NaiveDate::parse_from_str(date, format).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_messages() {
        assert_eq!(email_validation_message(""), Some(EMAIL_REQUIRED));
        assert_eq!(email_validation_message("bad@"), Some(EMAIL_INVALID));
        assert_eq!(email_validation_message("a@b.com"), None);
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(is_valid_email("USER_1%x@host-name.io"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("a@b.c"));
        assert!(!is_valid_email("a@b.c0m"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email(" a@b.com"));
        assert!(!is_valid_email("a@b.com trailing"));
    }

    #[test]
    fn test_email_tld_length_limit() {
        let tld_64 = "a".repeat(64);
        let tld_65 = "a".repeat(65);
        assert!(is_valid_email(&format!("x@y.{tld_64}")));
        assert!(!is_valid_email(&format!("x@y.{tld_65}")));
    }

    #[test]
    fn test_password_messages_in_order() {
        assert_eq!(password_validation_message(""), Some(PASSWORD_REQUIRED));
        assert_eq!(password_validation_message("abc"), Some(PASSWORD_TOO_SHORT));
        assert_eq!(password_validation_message("12345678"), Some(PASSWORD_NEEDS_LETTER));
        assert_eq!(password_validation_message("abcdefgh"), Some(PASSWORD_NEEDS_NUMBER));
        assert_eq!(password_validation_message("abcd1234"), None);
        // Length is checked before character classes
        assert_eq!(password_validation_message("a1"), Some(PASSWORD_TOO_SHORT));
    }

    #[test]
    fn test_password_length_counts_characters() {
        assert_eq!(password_validation_message("ééééééé1"), None);
        assert!(is_valid_password("pässwörd9"));
        assert!(!is_valid_password("password"));
    }

    #[test]
    fn test_password_accepts_any_decimal_digit() {
        // Arabic-Indic and fullwidth digits are decimal digits too
        assert_eq!(password_validation_message("abcdefg\u{0661}"), None);
        assert!(is_valid_password("abcdefg\u{FF13}"));
        // A vulgar fraction is numeric but not a decimal digit
        assert_eq!(
            password_validation_message("abcdefg\u{00BD}"),
            Some(PASSWORD_NEEDS_NUMBER)
        );
    }

    #[test]
    fn test_passwords_match() {
        assert!(passwords_match("x", "x"));
        assert!(!passwords_match("", ""));
        assert!(!passwords_match("abc", "abd"));
    }

    #[test]
    fn test_numeric_pattern() {
        assert!(is_valid_numeric("70"));
        assert!(is_valid_numeric("70.5"));
        assert!(is_valid_numeric(".5"));
        assert!(is_valid_numeric("5."));
        assert!(is_valid_numeric(""));
        assert!(!is_valid_numeric("-5"));
        assert!(!is_valid_numeric("1.2.3"));
        assert!(!is_valid_numeric("1e3"));
        assert!(!is_valid_numeric("70 kg"));
    }

    #[test]
    fn test_weight_validation() {
        let outcome = is_valid_weight("600", WeightUnit::Kilograms);
        assert!(!outcome.is_valid());
        assert_eq!(outcome.message(), Some(WEIGHT_RANGE_KG));

        let outcome = is_valid_weight("150", WeightUnit::Pounds);
        assert!(outcome.is_valid());
        assert_eq!(outcome.message(), None);
    }

    #[test]
    fn test_weight_check_order() {
        assert_eq!(is_valid_weight("", WeightUnit::Kilograms).message(), Some(WEIGHT_REQUIRED));
        assert_eq!(is_valid_weight("abc", WeightUnit::Kilograms).message(), Some(NUMERIC_INVALID));
        assert_eq!(is_valid_weight(".", WeightUnit::Kilograms).message(), Some(WEIGHT_INVALID));
        assert_eq!(is_valid_weight("0", WeightUnit::Kilograms).message(), Some(WEIGHT_RANGE_KG));
        assert_eq!(is_valid_weight("2", WeightUnit::Pounds).message(), Some(WEIGHT_RANGE_LBS));
    }

    #[test]
    fn test_weight_range_bounds_inclusive() {
        assert!(is_valid_weight("1", WeightUnit::Kilograms).is_valid());
        assert!(is_valid_weight("500", WeightUnit::Kilograms).is_valid());
        assert!(!is_valid_weight("500.01", WeightUnit::Kilograms).is_valid());
        assert!(is_valid_weight("2.2", WeightUnit::Pounds).is_valid());
        assert!(is_valid_weight("1100", WeightUnit::Pounds).is_valid());
        assert!(!is_valid_weight("1100.5", WeightUnit::Pounds).is_valid());
    }

    #[test]
    fn test_height_validation() {
        assert_eq!(is_valid_height("", HeightUnit::Centimeters).message(), Some(HEIGHT_REQUIRED));
        assert_eq!(is_valid_height("1,75", HeightUnit::Centimeters).message(), Some(NUMERIC_INVALID));
        assert_eq!(is_valid_height(".", HeightUnit::Inches).message(), Some(HEIGHT_INVALID));
        assert_eq!(is_valid_height("49.9", HeightUnit::Centimeters).message(), Some(HEIGHT_RANGE_CM));
        assert_eq!(is_valid_height("101", HeightUnit::Inches).message(), Some(HEIGHT_RANGE_INCHES));
        assert!(is_valid_height("50", HeightUnit::Centimeters).is_valid());
        assert!(is_valid_height("250", HeightUnit::Centimeters).is_valid());
        assert!(is_valid_height("20", HeightUnit::Inches).is_valid());
        assert!(is_valid_height("69.5", HeightUnit::Inches).is_valid());
    }

    #[test]
    fn test_parse_fields() {
        let weight = parse_weight("70.5", WeightUnit::Kilograms).unwrap();
        assert_eq!(weight, WeightValue::new(70.5, WeightUnit::Kilograms));

        let height = parse_height("69", HeightUnit::Inches).unwrap();
        assert_eq!(height, HeightValue::new(69.0, HeightUnit::Inches));

        assert_eq!(parse_weight("9999", WeightUnit::Kilograms), Err(WEIGHT_RANGE_KG));
        assert_eq!(parse_height("", HeightUnit::Centimeters), Err(HEIGHT_REQUIRED));
    }

    #[test]
    fn test_outcome_message_iff_invalid() {
        let valid = ValidationOutcome::valid();
        assert!(valid.is_valid() && valid.message().is_none());
        assert_eq!(valid.clone().into_result(), Ok(()));

        let invalid = ValidationOutcome::invalid("nope");
        assert!(!invalid.is_valid());
        assert_eq!(invalid.message(), Some("nope"));
        assert_eq!(invalid.into_result(), Err("nope".to_string()));

        assert!(ValidationOutcome::from_message(None).is_valid());
        assert!(!ValidationOutcome::from_message(Some("x")).is_valid());
    }

    #[test]
    fn test_is_not_empty() {
        let outcome = is_not_empty("   ", "Gender");
        assert_eq!(outcome.message(), Some("Gender is required"));
        assert!(is_not_empty(" Male ", "Gender").is_valid());
    }

    #[test]
    fn test_is_valid_date() {
        assert!(is_valid_date("2026-01-21", DEFAULT_DATE_FORMAT));
        assert!(!is_valid_date("2026-02-30", DEFAULT_DATE_FORMAT));
        assert!(!is_valid_date("21/01/2026", DEFAULT_DATE_FORMAT));
        assert!(is_valid_date("21/01/2026", "%d/%m/%Y"));
    }
}
