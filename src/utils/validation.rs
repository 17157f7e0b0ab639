//! Validation utilities for acquisition requests and configuration
//!
//! Range checks used by the session, the signal sources and the config
//! layer. Limits come from the constants module.

use crate::config::constants::{acquisition, signal};
use thiserror::Error;

/// Validation result type
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value out of valid range
    #[error("Field '{field}' value '{value}' is out of range [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: String,
        min: String,
        max: String,
    },
    /// Value is NaN or infinite
    #[error("Field '{field}' must be a finite number, got '{value}'")]
    NotFinite { field: String, value: String },
    /// Cross-field validation failure
    #[error("Constraint violation for fields [{}]: {message}", fields.join(", "))]
    ConstraintViolation { fields: Vec<String>, message: String },
}

/// Validate a numeric value against an inclusive range
pub fn validate_range<T>(field: &str, value: T, min: T, max: T) -> ValidationResult<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(value)
}

/// Validate acquisition duration in seconds
pub fn validate_duration(duration_secs: f64) -> ValidationResult<f64> {
    if !duration_secs.is_finite() {
        return Err(ValidationError::NotFinite {
            field: "duration_secs".to_string(),
            value: duration_secs.to_string(),
        });
    }
    validate_range("duration_secs", duration_secs, 0.0, signal::MAX_DURATION_SECS)
}

/// Validate number of channels requested from one source
pub fn validate_channel_count(count: usize) -> ValidationResult<usize> {
    validate_range(
        "channel_count",
        count,
        signal::MIN_CHANNEL_COUNT,
        signal::MAX_CHANNEL_COUNT,
    )
}

/// Validate a probability such as a loss or failure rate
pub fn validate_probability(field: &str, p: f64) -> ValidationResult<f64> {
    if !p.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
            value: p.to_string(),
        });
    }
    validate_range(field, p, 0.0, 1.0)
}

/// Validate a simulated delay in milliseconds
pub fn validate_delay_ms(field: &str, delay_ms: u64) -> ValidationResult<u64> {
    validate_range(field, delay_ms, 0, acquisition::MAX_SIMULATED_DELAY_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_validation() {
        assert!(validate_range("x", 5, 1, 10).is_ok());
        assert!(validate_range("x", 0, 1, 10).is_err());
        assert!(validate_range("x", 11, 1, 10).is_err());
    }

    #[test]
    fn test_duration_validation() {
        assert!(validate_duration(0.0).is_ok());
        assert!(validate_duration(60.0).is_ok());
        assert!(validate_duration(-1.0).is_err());
        assert!(matches!(
            validate_duration(f64::NAN),
            Err(ValidationError::NotFinite { .. })
        ));
    }

    #[test]
    fn test_channel_count_validation() {
        assert!(validate_channel_count(1).is_ok());
        assert!(validate_channel_count(0).is_err());
        assert!(validate_channel_count(signal::MAX_CHANNEL_COUNT + 1).is_err());
    }

    #[test]
    fn test_probability_validation() {
        assert!(validate_probability("p", 0.0).is_ok());
        assert!(validate_probability("p", 1.0).is_ok());
        assert!(validate_probability("p", 1.5).is_err());
        assert!(validate_probability("p", f64::INFINITY).is_err());
    }

    #[test]
    fn test_error_display() {
        let err = validate_range("channel_count", 0usize, 1, 64).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Field 'channel_count' value '0' is out of range [1, 64]"
        );
    }
}
