//! Signal model configuration structures
//! Location: src/hal/simulation/config.rs

use crate::config::constants::{acquisition, signal};
use crate::utils::validation::{validate_probability, ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};

/// Parameters for every modality's signal model
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct GeneratorConfig {
    pub analog: AnalogModelConfig,
    pub digital: DigitalModelConfig,
    pub ethernet: EthernetModelConfig,
}

/// Analog DAQ: one sinusoid cycle per run, gaussian noise, linear drift
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnalogModelConfig {
    pub amplitude: f64,
    pub noise_sigma: f64,
    /// Drift reached by the last sample, starting from zero
    pub drift_end: f64,
}

/// Digital I/O: uniform random states with post-transition debounce
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DigitalModelConfig {
    pub debounce_window: usize,
}

/// Networked instrument: gaussian base, slow periodic term, noise, packet loss
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EthernetModelConfig {
    pub base_mean: f64,
    pub base_sigma: f64,
    pub periodic_amplitude: f64,
    pub periodic_frequency_hz: f64,
    pub noise_sigma: f64,
    pub packet_loss_rate: f64,
}

impl Default for AnalogModelConfig {
    fn default() -> Self {
        Self {
            amplitude: signal::ANALOG_AMPLITUDE,
            noise_sigma: signal::ANALOG_NOISE_SIGMA,
            drift_end: signal::ANALOG_DRIFT_END,
        }
    }
}

impl Default for DigitalModelConfig {
    fn default() -> Self {
        Self {
            debounce_window: signal::DEBOUNCE_WINDOW_SAMPLES,
        }
    }
}

impl Default for EthernetModelConfig {
    fn default() -> Self {
        Self {
            base_mean: signal::ETHERNET_BASE_MEAN,
            base_sigma: signal::ETHERNET_BASE_SIGMA,
            periodic_amplitude: signal::ETHERNET_PERIODIC_AMPLITUDE,
            periodic_frequency_hz: signal::ETHERNET_PERIODIC_FREQUENCY_HZ,
            noise_sigma: signal::ETHERNET_NOISE_SIGMA,
            packet_loss_rate: acquisition::DEFAULT_PACKET_LOSS_RATE,
        }
    }
}

impl GeneratorConfig {
    /// Defaults with a specific packet loss rate
    pub fn with_packet_loss(packet_loss_rate: f64) -> Self {
        let mut config = Self::default();
        config.ethernet.packet_loss_rate = packet_loss_rate;
        config
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validate_sigma("analog.noise_sigma", self.analog.noise_sigma)?;
        validate_sigma("ethernet.base_sigma", self.ethernet.base_sigma)?;
        validate_sigma("ethernet.noise_sigma", self.ethernet.noise_sigma)?;
        validate_probability("ethernet.packet_loss_rate", self.ethernet.packet_loss_rate)?;
        Ok(())
    }
}

pub(crate) fn validate_sigma(field: &str, sigma: f64) -> ValidationResult<()> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(ValidationError::ConstraintViolation {
            fields: vec![field.to_string()],
            message: format!("standard deviation must be finite and non-negative, got {sigma}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = GeneratorConfig::default();
        assert_eq!(config.analog.amplitude, 5.0);
        assert_eq!(config.analog.noise_sigma, 0.1);
        assert_eq!(config.digital.debounce_window, 4);
        assert_eq!(config.ethernet.packet_loss_rate, 0.01);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_negative_sigma_rejected() {
        let mut config = GeneratorConfig::default();
        config.analog.noise_sigma = -0.1;
        assert!(config.validate().is_err());
    }
}
