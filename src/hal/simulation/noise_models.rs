//! Noise and artifact models for the simulated sources
//! Location: src/hal/simulation/noise_models.rs

use super::config::validate_sigma;
use crate::hal::AcquisitionError;
use crate::utils::validation::ValidationError;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Value at index `i` of `n` evenly spaced points from `start` to `end`, both inclusive
pub fn linspace_at(start: f64, end: f64, n: usize, i: usize) -> f64 {
    if n <= 1 {
        return start;
    }
    start + (end - start) * i as f64 / (n - 1) as f64
}

/// White gaussian noise
#[derive(Debug, Clone, Copy)]
pub struct GaussianNoise {
    dist: Normal<f64>,
}

impl GaussianNoise {
    /// Fails for a negative or non-finite `sigma`
    pub fn new(mean: f64, sigma: f64) -> Result<Self, AcquisitionError> {
        validate_sigma("sigma", sigma).map_err(AcquisitionError::InvalidRequest)?;
        let dist = Normal::new(mean, sigma).map_err(|e| {
            AcquisitionError::InvalidRequest(ValidationError::ConstraintViolation {
                fields: vec!["sigma".to_string()],
                message: e.to_string(),
            })
        })?;
        Ok(Self { dist })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.dist.sample(rng)
    }
}

/// Linear drift from zero to `end` across the run
#[derive(Debug, Clone, Copy)]
pub struct LinearDrift {
    pub end: f64,
}

impl LinearDrift {
    pub fn at(&self, index: usize, count: usize) -> f64 {
        linspace_at(0.0, self.end, count, index)
    }
}

/// Slow periodic interference, evaluated in seconds
#[derive(Debug, Clone, Copy)]
pub struct PeriodicVariation {
    pub amplitude: f64,
    pub frequency_hz: f64,
}

impl PeriodicVariation {
    pub fn at(&self, t_secs: f64) -> f64 {
        self.amplitude * (2.0 * std::f64::consts::PI * self.frequency_hz * t_secs).sin()
    }
}

/// Contact bounce suppression.
///
/// One left-to-right pass: whenever `states[i] != states[i - 1]`, the next
/// `window` samples are forced to `states[i]`.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    pub window: usize,
}

impl Debouncer {
    pub fn apply(&self, states: &mut [u8]) {
        for i in 1..states.len() {
            if states[i] != states[i - 1] {
                let end = (i + self.window).min(states.len() - 1);
                let state = states[i];
                for s in &mut states[i + 1..=end] {
                    *s = state;
                }
            }
        }
    }
}

/// Drops samples with a fixed probability. Lost samples become `None`, never zero.
#[derive(Debug, Clone, Copy)]
pub struct PacketLoss {
    rate: f64,
}

impl PacketLoss {
    pub fn new(rate: f64) -> Self {
        let rate = if rate.is_finite() { rate.clamp(0.0, 1.0) } else { 0.0 };
        Self { rate }
    }

    pub fn apply<R: Rng + ?Sized>(&self, rng: &mut R, value: f64) -> Option<f64> {
        if rng.gen_bool(self.rate) {
            None
        } else {
            Some(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_linspace_endpoints() {
        assert_eq!(linspace_at(0.0, 0.5, 11, 0), 0.0);
        assert_eq!(linspace_at(0.0, 0.5, 11, 10), 0.5);
        assert!((linspace_at(0.0, 0.5, 11, 5) - 0.25).abs() < 1e-12);
        assert_eq!(linspace_at(3.0, 9.0, 1, 0), 3.0);
    }

    #[test]
    fn test_debounce_forces_window() {
        let mut states = vec![0, 1, 0, 1, 0, 1, 1, 0, 0, 0];
        Debouncer { window: 4 }.apply(&mut states);
        assert_eq!(states, vec![0, 1, 1, 1, 1, 1, 1, 0, 0, 0]);
    }

    #[test]
    fn test_debounce_truncates_at_stream_end() {
        let mut states = vec![0, 0, 1, 0];
        Debouncer { window: 4 }.apply(&mut states);
        assert_eq!(states, vec![0, 0, 1, 1]);

        let mut empty: Vec<u8> = Vec::new();
        Debouncer { window: 4 }.apply(&mut empty);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_packet_loss_extremes() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(PacketLoss::new(0.0).apply(&mut rng, 1.5), Some(1.5));
        assert_eq!(PacketLoss::new(1.0).apply(&mut rng, 1.5), None);
    }

    #[test]
    fn test_gaussian_rejects_negative_sigma() {
        for sigma in [-1.0, -1e-9, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(GaussianNoise::new(0.0, sigma), Err(AcquisitionError::InvalidRequest(_))),
                "sigma {sigma}"
            );
        }
        let noise = GaussianNoise::new(0.0, 0.0).expect("zero sigma is valid");
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(noise.sample(&mut rng), 0.0);
    }

    #[test]
    fn test_periodic_variation() {
        let p = PeriodicVariation { amplitude: 0.05, frequency_hz: 0.1 };
        assert_eq!(p.at(0.0), 0.0);
        assert!((p.at(2.5) - 0.05).abs() < 1e-12);
    }
}
