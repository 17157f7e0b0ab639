//! Synthetic channel data for each acquisition modality
//! Location: src/hal/simulation/signal_generator.rs
//!
//! Every generator is a pure function of its inputs and the RNG it is handed.
//! Channels are generated in parallel, each from its own seed drawn from the
//! caller's RNG, so a seeded run is reproducible regardless of thread count.

use super::config::{AnalogModelConfig, DigitalModelConfig, EthernetModelConfig, GeneratorConfig};
use super::noise_models::{linspace_at, Debouncer, GaussianNoise, LinearDrift, PacketLoss, PeriodicVariation};
use crate::hal::{AcquisitionError, Modality, RawAcquisition};
use crate::utils::time::sample_timestamps;
use crate::utils::validation::{validate_channel_count, validate_duration};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Stateless signal source for all modalities
#[derive(Debug, Clone, Default)]
pub struct SignalGenerator {
    config: GeneratorConfig,
}

impl SignalGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, AcquisitionError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate `duration_secs` of data on `channel_count` channels.
    ///
    /// Produces `floor(duration_secs * rate)` samples per channel, timestamped
    /// from `start_nanos` at the modality's nominal period.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        modality: Modality,
        duration_secs: f64,
        channel_count: usize,
        start_nanos: u64,
        rng: &mut R,
    ) -> Result<RawAcquisition, AcquisitionError> {
        validate_duration(duration_secs)?;
        validate_channel_count(channel_count)?;

        let num_samples = modality.sample_count(duration_secs);
        let seeds: Vec<u64> = (0..channel_count).map(|_| rng.gen()).collect();

        let channels = seeds
            .into_par_iter()
            .map(|seed| {
                let mut channel_rng = StdRng::seed_from_u64(seed);
                match modality {
                    Modality::Analog => analog_channel(num_samples, &self.config.analog, &mut channel_rng),
                    Modality::Digital => Ok(digital_channel(num_samples, &self.config.digital, &mut channel_rng)),
                    Modality::Ethernet => ethernet_channel(
                        num_samples,
                        duration_secs,
                        &self.config.ethernet,
                        &mut channel_rng,
                    ),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RawAcquisition {
            modality,
            sampling_rate_hz: modality.sampling_rate_hz(),
            timestamps: sample_timestamps(start_nanos, modality.sampling_rate_hz(), num_samples),
            channels,
        })
    }
}

/// Analog sensor channel.
///
/// The sinusoid completes exactly one period over `num_samples`, whatever the
/// run duration: phase follows the sample index, not wall-clock time.
// TODO: switch to a time-domain phase (2π·f·t) once downstream limits are re-derived for it.
pub fn analog_channel<R: Rng + ?Sized>(
    num_samples: usize,
    model: &AnalogModelConfig,
    rng: &mut R,
) -> Result<Vec<Option<f64>>, AcquisitionError> {
    let noise = GaussianNoise::new(0.0, model.noise_sigma)?;
    let drift = LinearDrift { end: model.drift_end };

    Ok((0..num_samples)
        .map(|i| {
            let phase = linspace_at(0.0, 2.0 * std::f64::consts::PI, num_samples, i);
            let base = phase.sin() * model.amplitude;
            Some(base + noise.sample(rng) + drift.at(i, num_samples))
        })
        .collect())
}

/// Digital I/O channel: uniform {0, 1} states, then one debounce pass
pub fn digital_channel<R: Rng + ?Sized>(
    num_samples: usize,
    model: &DigitalModelConfig,
    rng: &mut R,
) -> Vec<Option<f64>> {
    let mut states: Vec<u8> = (0..num_samples).map(|_| rng.gen_range(0..=1)).collect();
    Debouncer { window: model.debounce_window }.apply(&mut states);
    states.into_iter().map(|s| Some(f64::from(s))).collect()
}

/// Networked instrument channel with packet loss
pub fn ethernet_channel<R: Rng + ?Sized>(
    num_samples: usize,
    duration_secs: f64,
    model: &EthernetModelConfig,
    rng: &mut R,
) -> Result<Vec<Option<f64>>, AcquisitionError> {
    let base = GaussianNoise::new(model.base_mean, model.base_sigma)?;
    let noise = GaussianNoise::new(0.0, model.noise_sigma)?;
    let periodic = PeriodicVariation {
        amplitude: model.periodic_amplitude,
        frequency_hz: model.periodic_frequency_hz,
    };
    let loss = PacketLoss::new(model.packet_loss_rate);

    Ok((0..num_samples)
        .map(|i| {
            let t = linspace_at(0.0, duration_secs, num_samples, i);
            let value = base.sample(rng) + periodic.at(t) + noise.sample(rng);
            loss.apply(rng, value)
        })
        .collect())
}
