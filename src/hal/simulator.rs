//! Simulated acquisition session
//!
//! Wraps the signal generator in a connect/read/disconnect lifecycle with
//! bounded simulated delays. Analog and digital connects always succeed;
//! networked instruments add latency and fail to connect with a configurable
//! probability.

use crate::config::AcquisitionConfig;
use crate::hal::simulation::{GeneratorConfig, SignalGenerator};
use crate::hal::{AcquisitionDevice, AcquisitionError, Modality, RawAcquisition, SessionState};
use crate::utils::time::{SystemTimeProvider, TimeProvider};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Counters for one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub state: SessionState,
    pub connects: u64,
    pub connect_failures: u64,
    pub reads: u64,
    pub samples_generated: u64,
    pub samples_lost: u64,
}

/// Single-owner acquisition session over the simulated signal sources
pub struct AcquisitionSession {
    config: AcquisitionConfig,
    generator: SignalGenerator,
    rng: StdRng,
    time_provider: Arc<dyn TimeProvider>,
    status: SessionStatus,
}

impl std::fmt::Debug for AcquisitionSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcquisitionSession")
            .field("config", &self.config)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl AcquisitionSession {
    /// Create a session. Seeds from `config.seed` when present, entropy otherwise.
    pub fn new(config: AcquisitionConfig) -> Result<Self, AcquisitionError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Create a session with an explicit seed, overriding `config.seed`
    pub fn with_seed(config: AcquisitionConfig, seed: u64) -> Result<Self, AcquisitionError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: AcquisitionConfig, rng: StdRng) -> Result<Self, AcquisitionError> {
        config.validate()?;
        let generator = SignalGenerator::new(GeneratorConfig::with_packet_loss(config.packet_loss_rate))?;
        Ok(Self {
            config,
            generator,
            rng,
            time_provider: Arc::new(SystemTimeProvider),
            status: SessionStatus::default(),
        })
    }

    /// Replace the signal models
    pub fn with_generator(mut self, generator: SignalGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Replace the clock used for sample timestamps
    pub fn with_time_provider(mut self, time_provider: Arc<dyn TimeProvider>) -> Self {
        self.time_provider = time_provider;
        self
    }

    pub fn config(&self) -> &AcquisitionConfig {
        &self.config
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    async fn simulate_delay(delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl AcquisitionDevice for AcquisitionSession {
    async fn connect(&mut self, modality: Modality) -> Result<(), AcquisitionError> {
        if self.status.state == SessionState::Connected(modality) {
            return Ok(());
        }

        if modality.is_networked() {
            Self::simulate_delay(self.config.network_latency()).await;
            if self.rng.gen_bool(self.config.connect_failure_rate) {
                self.status.connect_failures += 1;
                tracing::warn!(%modality, "simulated instrument connection failure");
                return Err(AcquisitionError::ConnectionFailure { modality });
            }
        } else {
            Self::simulate_delay(self.config.connect_delay()).await;
        }

        self.status.state = SessionState::Connected(modality);
        self.status.connects += 1;
        tracing::info!(%modality, "connected to source");
        Ok(())
    }

    async fn read(
        &mut self,
        modality: Modality,
        duration_secs: f64,
        channel_count: usize,
    ) -> Result<RawAcquisition, AcquisitionError> {
        if self.status.state != SessionState::Connected(modality) {
            return Err(AcquisitionError::NotConnected { modality });
        }

        let start = self.time_provider.now_nanos();
        let raw = self
            .generator
            .generate(modality, duration_secs, channel_count, start, &mut self.rng)?;

        if modality.is_networked() {
            Self::simulate_delay(self.config.network_latency()).await;
        }

        self.status.reads += 1;
        self.status.samples_generated += (raw.len() * raw.channel_count()) as u64;
        self.status.samples_lost += raw.missing_count() as u64;
        tracing::debug!(
            %modality,
            samples = raw.len(),
            channels = raw.channel_count(),
            missing = raw.missing_count(),
            "read complete"
        );
        Ok(raw)
    }

    async fn disconnect(&mut self) -> Result<(), AcquisitionError> {
        let SessionState::Connected(modality) = self.status.state else {
            return Ok(());
        };

        if !modality.is_networked() {
            Self::simulate_delay(self.config.disconnect_delay()).await;
        }
        self.status.state = SessionState::Disconnected;
        tracing::info!(%modality, "disconnected from source");
        Ok(())
    }

    fn state(&self) -> SessionState {
        self.status.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::MockTimeProvider;

    fn instant_session(seed: u64) -> AcquisitionSession {
        AcquisitionSession::new(AcquisitionConfig::instant(seed)).unwrap()
    }

    #[tokio::test]
    async fn test_connection_state_management() {
        let mut session = instant_session(1);
        assert_eq!(session.state(), SessionState::Disconnected);

        session.connect(Modality::Analog).await.unwrap();
        assert_eq!(session.state(), SessionState::Connected(Modality::Analog));
        assert!(session.is_connected());

        session.disconnect().await.unwrap();
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    #[tokio::test]
    async fn test_read_requires_connection() {
        let mut session = instant_session(1);
        let result = session.read(Modality::Analog, 1.0, 1).await;
        assert_eq!(result, Err(AcquisitionError::NotConnected { modality: Modality::Analog }));

        session.connect(Modality::Analog).await.unwrap();
        let result = session.read(Modality::Digital, 1.0, 1).await;
        assert_eq!(result, Err(AcquisitionError::NotConnected { modality: Modality::Digital }));
    }

    #[tokio::test]
    async fn test_disconnect_is_idempotent() {
        let mut session = instant_session(1);
        session.disconnect().await.unwrap();
        session.disconnect().await.unwrap();
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    #[tokio::test]
    async fn test_connect_retargets_modality() {
        let mut session = instant_session(1);
        session.connect(Modality::Analog).await.unwrap();
        session.connect(Modality::Digital).await.unwrap();
        assert_eq!(session.state(), SessionState::Connected(Modality::Digital));
        assert_eq!(session.status().connects, 2);
    }

    #[tokio::test]
    async fn test_networked_connect_failure_leaves_state_unchanged() {
        let config = AcquisitionConfig { connect_failure_rate: 1.0, ..AcquisitionConfig::instant(3) };
        let mut session = AcquisitionSession::new(config).unwrap();

        let result = session.connect(Modality::Ethernet).await;
        assert_eq!(result, Err(AcquisitionError::ConnectionFailure { modality: Modality::Ethernet }));
        assert_eq!(session.state(), SessionState::Disconnected);
        assert_eq!(session.status().connect_failures, 1);
    }

    #[tokio::test]
    async fn test_local_connect_never_fails() {
        let config = AcquisitionConfig { connect_failure_rate: 1.0, ..AcquisitionConfig::instant(3) };
        let mut session = AcquisitionSession::new(config).unwrap();
        session.connect(Modality::Analog).await.unwrap();
        session.connect(Modality::Digital).await.unwrap();
        assert!(session.is_connected());
    }

    #[tokio::test]
    async fn test_read_uses_injected_clock() {
        let clock = Arc::new(MockTimeProvider::new(1_000_000_000));
        let mut session = instant_session(5).with_time_provider(clock.clone());
        session.connect(Modality::Ethernet).await.unwrap();

        let raw = session.read(Modality::Ethernet, 1.0, 2).await.unwrap();
        assert_eq!(raw.len(), 10);
        assert_eq!(raw.timestamps[0], 1_000_000_000);
        assert_eq!(raw.timestamps[9], 1_900_000_000);
        assert_eq!(session.status().samples_generated, 20);
    }

    #[tokio::test]
    async fn test_packet_loss_is_counted() {
        let config = AcquisitionConfig { packet_loss_rate: 1.0, ..AcquisitionConfig::instant(3) };
        let mut session = AcquisitionSession::new(config).unwrap();
        session.connect(Modality::Ethernet).await.unwrap();
        let raw = session.read(Modality::Ethernet, 2.0, 1).await.unwrap();
        assert_eq!(raw.missing_count(), 20);
        assert_eq!(session.status().samples_lost, 20);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AcquisitionConfig { packet_loss_rate: -0.5, ..AcquisitionConfig::instant(3) };
        assert!(matches!(
            AcquisitionSession::new(config),
            Err(AcquisitionError::InvalidRequest(_))
        ));
    }
}
