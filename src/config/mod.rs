// src/config/mod.rs
//! Configuration for acquisition sessions and the statistics engine

pub mod constants;
pub mod loader;

pub use constants::*;
pub use loader::{ConfigError, ConfigLoader};

use crate::utils::validation::{validate_delay_ms, validate_probability, ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Complete system configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct SystemConfig {
    #[serde(default)]
    pub acquisition: AcquisitionConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Simulated instrument timing and failure injection
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AcquisitionConfig {
    /// Delay before a DAQ connect completes
    #[serde(default = "defaults::connect_delay_ms")]
    pub connect_delay_ms: u64,

    /// Delay before a DAQ disconnect completes
    #[serde(default = "defaults::disconnect_delay_ms")]
    pub disconnect_delay_ms: u64,

    /// Latency of networked instrument connect and read
    #[serde(default = "defaults::network_latency_ms")]
    pub network_latency_ms: u64,

    /// Fraction of networked samples marked missing
    #[serde(default = "defaults::packet_loss_rate")]
    pub packet_loss_rate: f64,

    /// Chance a networked instrument connect fails
    #[serde(default = "defaults::connect_failure_rate")]
    pub connect_failure_rate: f64,

    /// Seed for every random draw of a run; entropy when absent.
    /// At most `i64::MAX` so the value survives TOML layering.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Statistics engine settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AnalysisConfig {
    #[serde(default = "defaults::control_sigma")]
    pub control_sigma: f64,
}

/// Default value providers using constants
mod defaults {
    use crate::config::constants::*;

    pub fn connect_delay_ms() -> u64 { acquisition::DEFAULT_CONNECT_DELAY_MS }
    pub fn disconnect_delay_ms() -> u64 { acquisition::DEFAULT_DISCONNECT_DELAY_MS }
    pub fn network_latency_ms() -> u64 { acquisition::DEFAULT_NETWORK_LATENCY_MS }
    pub fn packet_loss_rate() -> f64 { acquisition::DEFAULT_PACKET_LOSS_RATE }
    pub fn connect_failure_rate() -> f64 { acquisition::DEFAULT_CONNECT_FAILURE_RATE }

    pub fn control_sigma() -> f64 { analysis::DEFAULT_CONTROL_SIGMA }
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            connect_delay_ms: defaults::connect_delay_ms(),
            disconnect_delay_ms: defaults::disconnect_delay_ms(),
            network_latency_ms: defaults::network_latency_ms(),
            packet_loss_rate: defaults::packet_loss_rate(),
            connect_failure_rate: defaults::connect_failure_rate(),
            seed: None,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            control_sigma: defaults::control_sigma(),
        }
    }
}

impl AcquisitionConfig {
    /// Zero delays, no loss, no connect failures. Deterministic for a given seed.
    pub fn instant(seed: u64) -> Self {
        Self {
            connect_delay_ms: 0,
            disconnect_delay_ms: 0,
            network_latency_ms: 0,
            packet_loss_rate: 0.0,
            connect_failure_rate: 0.0,
            seed: Some(seed),
        }
    }

    pub fn connect_delay(&self) -> Duration {
        Duration::from_millis(self.connect_delay_ms)
    }

    pub fn disconnect_delay(&self) -> Duration {
        Duration::from_millis(self.disconnect_delay_ms)
    }

    pub fn network_latency(&self) -> Duration {
        Duration::from_millis(self.network_latency_ms)
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validate_delay_ms("connect_delay_ms", self.connect_delay_ms)?;
        validate_delay_ms("disconnect_delay_ms", self.disconnect_delay_ms)?;
        validate_delay_ms("network_latency_ms", self.network_latency_ms)?;
        validate_probability("packet_loss_rate", self.packet_loss_rate)?;
        validate_probability("connect_failure_rate", self.connect_failure_rate)?;
        if let Some(seed) = self.seed {
            if seed > acquisition::MAX_SEED {
                return Err(ValidationError::ConstraintViolation {
                    fields: vec!["seed".to_string()],
                    message: format!("must not exceed {}, got {seed}", acquisition::MAX_SEED),
                });
            }
        }
        Ok(())
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> ValidationResult<()> {
        if !self.control_sigma.is_finite() || self.control_sigma <= 0.0 {
            return Err(ValidationError::ConstraintViolation {
                fields: vec!["control_sigma".to_string()],
                message: format!("must be a positive finite number, got {}", self.control_sigma),
            });
        }
        Ok(())
    }
}

impl SystemConfig {
    /// Validate every section
    pub fn validate(&self) -> ValidationResult<()> {
        self.acquisition.validate()?;
        self.analysis.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SystemConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.acquisition.connect_delay(), Duration::from_millis(500));
        assert_eq!(config.acquisition.packet_loss_rate, 0.01);
        assert_eq!(config.analysis.control_sigma, 3.0);
    }

    #[test]
    fn test_invalid_probability_rejected() {
        let mut config = SystemConfig::default();
        config.acquisition.connect_failure_rate = 1.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_control_sigma_rejected() {
        let mut config = SystemConfig::default();
        config.analysis.control_sigma = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ValidationError::ConstraintViolation { .. })
        ));
    }

    #[test]
    fn test_instant_config() {
        let config = AcquisitionConfig::instant(7);
        assert!(config.validate().is_ok());
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.network_latency(), Duration::ZERO);
    }

    #[test]
    fn test_seed_beyond_toml_integer_range_rejected() {
        let mut config = AcquisitionConfig::instant(acquisition::MAX_SEED);
        assert!(config.validate().is_ok());
        assert!(toml::to_string(&SystemConfig { acquisition: config.clone(), ..Default::default() }).is_ok());

        config.seed = Some(acquisition::MAX_SEED + 1);
        assert!(matches!(
            config.validate(),
            Err(ValidationError::ConstraintViolation { fields, .. }) if fields == ["seed"]
        ));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SystemConfig = toml::from_str("[acquisition]\nseed = 42\n").expect("parse");
        assert_eq!(config.acquisition.seed, Some(42));
        assert_eq!(config.acquisition.network_latency_ms, 50);
        assert_eq!(config.analysis, AnalysisConfig::default());
    }
}
