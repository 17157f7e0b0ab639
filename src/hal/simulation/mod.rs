//! Synthetic signal sources for simulated instruments
//! Location: src/hal/simulation/mod.rs

pub mod config;
pub mod noise_models;
pub mod signal_generator;

pub use config::{AnalogModelConfig, DigitalModelConfig, EthernetModelConfig, GeneratorConfig};
pub use noise_models::{Debouncer, GaussianNoise, LinearDrift, PacketLoss, PeriodicVariation};
pub use signal_generator::{analog_channel, digital_channel, ethernet_channel, SignalGenerator};
