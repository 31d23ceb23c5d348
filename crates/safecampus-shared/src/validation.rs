//! Presence and format rules shared by the gateway (authoritative) and the
//! client forms (pre-submit).

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;

use crate::constants::{CONTACT_NAME_MAX, CONTACT_NAME_MIN, PHONE_PATTERN};
use crate::error::ValidationError;

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(PHONE_PATTERN).expect("phone pattern is a valid regex"))
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("email pattern is a valid regex")
    })
}

pub fn is_valid_phone(value: &str) -> bool {
    phone_regex().is_match(value)
}

/// Reject an empty or whitespace-only field.
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Missing(field));
    }
    Ok(())
}

pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    require("Contact number", value)?;
    if !is_valid_phone(value) {
        return Err(ValidationError::InvalidPhone {
            value: value.to_string(),
        });
    }
    Ok(())
}

pub fn validate_contact_name(value: &str) -> Result<(), ValidationError> {
    require("Name", value)?;
    let len = value.trim().chars().count();
    if !(CONTACT_NAME_MIN..=CONTACT_NAME_MAX).contains(&len) {
        return Err(ValidationError::Length {
            field: "Name",
            min: CONTACT_NAME_MIN,
            max: CONTACT_NAME_MAX,
        });
    }
    Ok(())
}

pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    require("Email", value)?;
    if !email_regex().is_match(value) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

pub fn validate_password_confirmation(
    password: &str,
    confirmation: &str,
) -> Result<(), ValidationError> {
    require("Password", password)?;
    require("Confirm Password", confirmation)?;
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), ValidationError> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(ValidationError::OutOfRange {
            field: "latitude",
            value: latitude,
        });
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(ValidationError::OutOfRange {
            field: "longitude",
            value: longitude,
        });
    }
    Ok(())
}

/// Parse an incident date sent either as RFC 3339 or as a bare `YYYY-MM-DD`.
pub fn parse_date(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ValidationError::InvalidDate(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_accepts_valid_numbers() {
        for phone in ["9999999999", "+19998887777", "123456789012345", "+441234567890"] {
            assert!(validate_phone(phone).is_ok(), "{phone} should be accepted");
        }
    }

    #[test]
    fn test_phone_rejects_invalid_numbers() {
        for phone in [
            "",
            "123456789",
            "1234567890123456",
            "++1234567890",
            "123-456-7890",
            "12345 67890",
            "abcdefghij",
            "1234567890+",
        ] {
            assert!(validate_phone(phone).is_err(), "{phone:?} should be rejected");
        }
    }

    #[test]
    fn test_contact_name_bounds() {
        assert!(validate_contact_name("Bob").is_ok());
        assert!(validate_contact_name(&"x".repeat(100)).is_ok());
        assert_eq!(
            validate_contact_name("Al"),
            Err(ValidationError::Length {
                field: "Name",
                min: 3,
                max: 100
            })
        );
        assert!(validate_contact_name(&"x".repeat(101)).is_err());
        // Surrounding whitespace does not count towards the length.
        assert!(validate_contact_name("  Al  ").is_err());
        assert!(validate_contact_name(&format!(" {} ", "x".repeat(100))).is_ok());
        assert_eq!(
            validate_contact_name("   "),
            Err(ValidationError::Missing("Name"))
        );
    }

    #[test]
    fn test_email_format() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("first.last@campus.edu.au").is_ok());
        assert!(validate_email("a@x").is_err());
        assert!(validate_email("not an email").is_err());
        assert!(validate_email("@x.com").is_err());
    }

    #[test]
    fn test_password_confirmation() {
        assert!(validate_password_confirmation("pw", "pw").is_ok());
        assert_eq!(
            validate_password_confirmation("pw", "wp"),
            Err(ValidationError::PasswordMismatch)
        );
        assert!(validate_password_confirmation("", "").is_err());
    }

    #[test]
    fn test_coordinates_range() {
        assert!(validate_coordinates(51.5, -0.12).is_ok());
        assert!(validate_coordinates(-90.0, 180.0).is_ok());
        assert!(validate_coordinates(90.5, 0.0).is_err());
        assert!(validate_coordinates(0.0, -180.5).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_parse_date_formats() {
        let d = parse_date("2024-03-01").unwrap();
        assert_eq!(d.to_rfc3339(), "2024-03-01T00:00:00+00:00");
        let d = parse_date("2024-03-01T10:30:00+02:00").unwrap();
        assert_eq!(d.to_rfc3339(), "2024-03-01T08:30:00+00:00");
        assert!(parse_date("yesterday").is_err());
    }
}
