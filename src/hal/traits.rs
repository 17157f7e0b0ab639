// src/hal/traits.rs
//! Core HAL traits for instrument acquisition

use crate::hal::types::{Modality, RawAcquisition, SessionState};
use crate::utils::validation::ValidationError;
use async_trait::async_trait;
use thiserror::Error;

/// Acquisition failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AcquisitionError {
    /// Unknown source type requested
    #[error("Unsupported modality: {0}")]
    UnsupportedModality(String),
    /// Read attempted without a connection to that modality
    #[error("Session is not connected to a {modality} source")]
    NotConnected { modality: Modality },
    /// Simulated transient failure while connecting a networked instrument
    #[error("Failed to connect to {modality} source")]
    ConnectionFailure { modality: Modality },
    /// Duration or channel count outside accepted ranges
    #[error("Invalid acquisition request: {0}")]
    InvalidRequest(#[from] ValidationError),
}

/// Lifecycle of one acquisition device: connect, read, disconnect.
///
/// Implementations are owned by a single run; they are not shared between callers.
#[async_trait]
pub trait AcquisitionDevice: Send {
    /// Connect to a source of the given modality. On failure the state is unchanged.
    async fn connect(&mut self, modality: Modality) -> Result<(), AcquisitionError>;

    /// Read `duration_secs` worth of samples on `channel_count` channels.
    /// Only valid while connected to `modality`.
    async fn read(
        &mut self,
        modality: Modality,
        duration_secs: f64,
        channel_count: usize,
    ) -> Result<RawAcquisition, AcquisitionError>;

    /// Disconnect. Idempotent.
    async fn disconnect(&mut self) -> Result<(), AcquisitionError>;

    /// Current lifecycle state
    fn state(&self) -> SessionState;

    fn is_connected(&self) -> bool {
        matches!(self.state(), SessionState::Connected(_))
    }
}
