// src/hal/types.rs
//! Core types for simulated instrument acquisition

use crate::config::constants::signal;
use crate::hal::AcquisitionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Acquisition modality. Each has its own sampling rate and artifact model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    /// Analog sensor through a DAQ card
    Analog,
    /// Digital I/O line
    Digital,
    /// Networked instrument
    Ethernet,
}

impl Modality {
    pub const ALL: [Modality; 3] = [Modality::Analog, Modality::Digital, Modality::Ethernet];

    /// Nominal sampling rate in Hz
    pub fn sampling_rate_hz(self) -> u32 {
        match self {
            Modality::Analog => signal::ANALOG_SAMPLING_RATE_HZ,
            Modality::Digital => signal::DIGITAL_SAMPLING_RATE_HZ,
            Modality::Ethernet => signal::ETHERNET_SAMPLING_RATE_HZ,
        }
    }

    /// Only networked instruments lose packets, add read latency and can fail to connect
    pub fn is_networked(self) -> bool {
        matches!(self, Modality::Ethernet)
    }

    /// Number of samples acquired over `duration_secs`, truncated
    pub fn sample_count(self, duration_secs: f64) -> usize {
        (duration_secs * self.sampling_rate_hz() as f64).floor().max(0.0) as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Modality::Analog => "analog",
            Modality::Digital => "digital",
            Modality::Ethernet => "ethernet",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Modality {
    type Err = AcquisitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "analog" => Ok(Modality::Analog),
            "digital" => Ok(Modality::Digital),
            "ethernet" => Ok(Modality::Ethernet),
            _ => Err(AcquisitionError::UnsupportedModality(s.to_string())),
        }
    }
}

/// One acquisition instant across all channels of a read.
/// `None` marks a sample lost in transit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: u64,
    pub channel_values: Vec<Option<f64>>,
}

/// Result of one read: shared timestamps plus one value array per channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAcquisition {
    pub modality: Modality,
    pub sampling_rate_hz: u32,
    /// Nanoseconds since the Unix epoch, one per sample
    pub timestamps: Vec<u64>,
    /// `channels[c][i]` is channel `c` at `timestamps[i]`
    pub channels: Vec<Vec<Option<f64>>>,
}

impl RawAcquisition {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn channel(&self, index: usize) -> Option<&[Option<f64>]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Number of samples marked missing across all channels
    pub fn missing_count(&self) -> usize {
        self.channels
            .iter()
            .map(|c| c.iter().filter(|v| v.is_none()).count())
            .sum()
    }

    /// Row view of sample `index`
    pub fn sample(&self, index: usize) -> Option<Sample> {
        let timestamp = *self.timestamps.get(index)?;
        let channel_values = self
            .channels
            .iter()
            .map(|c| c.get(index).copied().flatten())
            .collect();
        Some(Sample { timestamp, channel_values })
    }

    pub fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        (0..self.len()).filter_map(move |i| self.sample(i))
    }
}

/// Session lifecycle state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    Disconnected,
    Connected(Modality),
}

/// One read within an acquisition plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadRequest {
    pub modality: Modality,
    pub duration_secs: f64,
    pub channel_count: usize,
}

impl ReadRequest {
    pub fn new(modality: Modality, duration_secs: f64, channel_count: usize) -> Self {
        Self { modality, duration_secs, channel_count }
    }

    /// Single-channel read, the common case for test profiles
    pub fn single(modality: Modality, duration_secs: f64) -> Self {
        Self::new(modality, duration_secs, signal::DEFAULT_CHANNEL_COUNT)
    }
}
