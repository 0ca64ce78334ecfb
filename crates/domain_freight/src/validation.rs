//! Field-format validation helpers

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::FreightError;

/// Indian registration plate as written on freight paperwork:
/// state code, RTO district, series, number, space-separated.
static TRUCK_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z]{2}\s\d{2}\s[A-Z]{2}\s\d{4}$").expect("truck number pattern is valid")
});

/// Validates a truck registration number against the plate format
///
/// # Errors
///
/// Returns `InvalidTruckNumber` carrying the offending input.
pub fn validate_truck_number(number: &str) -> Result<(), FreightError> {
    if TRUCK_NUMBER.is_match(number) {
        Ok(())
    } else {
        Err(FreightError::InvalidTruckNumber(number.to_string()))
    }
}

/// Rejects empty or whitespace-only required fields
pub(crate) fn require_non_empty(value: &str, field: &'static str) -> Result<(), FreightError> {
    if value.trim().is_empty() {
        Err(FreightError::MissingField(field))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_truck_numbers() {
        assert!(validate_truck_number("MH 12 AB 1234").is_ok());
        assert!(validate_truck_number("GJ 01 ZZ 0001").is_ok());
    }

    #[test]
    fn test_invalid_truck_numbers() {
        // Missing spaces
        assert!(validate_truck_number("MH12AB1234").is_err());
        // Lowercase
        assert!(validate_truck_number("mh 12 ab 1234").is_err());
        // Wrong digit counts
        assert!(validate_truck_number("MH 123 AB 1234").is_err());
        assert!(validate_truck_number("MH 12 AB 123").is_err());
        // Trailing garbage
        assert!(validate_truck_number("MH 12 AB 1234 ").is_err());
        assert!(validate_truck_number("").is_err());
    }

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty("Pune", "origin").is_ok());
        assert!(require_non_empty("   ", "origin").is_err());
    }
}
