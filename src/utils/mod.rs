//! Common utility functions shared across the testbench
//!
//! - Time and timestamp management with an injectable clock
//! - Range validation for requests and configuration
//!
//! Limits come from the config constants module.

pub mod time;
pub mod validation;

// Re-export commonly used functions for convenience
pub use time::{
    calculate_sample_period_nanos,
    current_timestamp_micros,
    current_timestamp_nanos,
    sample_timestamps,
    MockTimeProvider,
    SystemTimeProvider,
    TimeProvider,
};

pub use validation::{
    validate_channel_count,
    validate_delay_ms,
    validate_duration,
    validate_probability,
    validate_range,
    ValidationError,
    ValidationResult,
};
