// src/acquisition/mod.rs
//! Acquisition plans and their execution against a device
//!
//! A plan lists the reads one instrument performs during a test. Executing it
//! connects as needed, reads in order, and always attempts a disconnect before
//! returning, on success and on failure alike.

use crate::hal::{AcquisitionDevice, AcquisitionError, RawAcquisition, ReadRequest, SessionState};
use serde::{Deserialize, Serialize};

/// Reads performed through one instrument session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentPlan {
    /// Human-readable instrument name for logs
    pub instrument: String,
    pub reads: Vec<ReadRequest>,
}

impl InstrumentPlan {
    pub fn new(instrument: impl Into<String>, reads: Vec<ReadRequest>) -> Self {
        Self { instrument: instrument.into(), reads }
    }
}

/// Execute `plan` on `device`, returning one acquisition per read in order.
///
/// The device is disconnected on every exit path. A disconnect failure after
/// a read failure is logged and the read failure is returned.
pub async fn acquire<D>(device: &mut D, plan: &InstrumentPlan) -> Result<Vec<RawAcquisition>, AcquisitionError>
where
    D: AcquisitionDevice + ?Sized,
{
    let result = run_reads(device, plan).await;
    let disconnected = device.disconnect().await;

    match (result, disconnected) {
        (Ok(data), Ok(())) => Ok(data),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), Ok(())) => {
            tracing::warn!(instrument = %plan.instrument, error = %e, "acquisition failed");
            Err(e)
        }
        (Err(e), Err(disconnect_err)) => {
            tracing::warn!(
                instrument = %plan.instrument,
                error = %e,
                disconnect_error = %disconnect_err,
                "acquisition failed and disconnect did not complete"
            );
            Err(e)
        }
    }
}

async fn run_reads<D>(device: &mut D, plan: &InstrumentPlan) -> Result<Vec<RawAcquisition>, AcquisitionError>
where
    D: AcquisitionDevice + ?Sized,
{
    let mut acquisitions = Vec::with_capacity(plan.reads.len());
    for request in &plan.reads {
        if device.state() != SessionState::Connected(request.modality) {
            device.connect(request.modality).await?;
        }
        let raw = device
            .read(request.modality, request.duration_secs, request.channel_count)
            .await?;
        acquisitions.push(raw);
    }
    tracing::debug!(instrument = %plan.instrument, reads = acquisitions.len(), "plan complete");
    Ok(acquisitions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AcquisitionConfig;
    use crate::hal::{AcquisitionSession, Modality};
    use async_trait::async_trait;

    /// Device that fails on a chosen read and records disconnects
    struct FlakyDevice {
        state: SessionState,
        fail_on_read: Option<usize>,
        reads: usize,
        disconnects: usize,
    }

    impl FlakyDevice {
        fn new(fail_on_read: Option<usize>) -> Self {
            Self { state: SessionState::Disconnected, fail_on_read, reads: 0, disconnects: 0 }
        }
    }

    #[async_trait]
    impl AcquisitionDevice for FlakyDevice {
        async fn connect(&mut self, modality: Modality) -> Result<(), AcquisitionError> {
            self.state = SessionState::Connected(modality);
            Ok(())
        }

        async fn read(
            &mut self,
            modality: Modality,
            _duration_secs: f64,
            channel_count: usize,
        ) -> Result<RawAcquisition, AcquisitionError> {
            let index = self.reads;
            self.reads += 1;
            if self.fail_on_read == Some(index) {
                return Err(AcquisitionError::ConnectionFailure { modality });
            }
            Ok(RawAcquisition {
                modality,
                sampling_rate_hz: modality.sampling_rate_hz(),
                timestamps: vec![0],
                channels: vec![vec![Some(1.0)]; channel_count],
            })
        }

        async fn disconnect(&mut self) -> Result<(), AcquisitionError> {
            self.disconnects += 1;
            self.state = SessionState::Disconnected;
            Ok(())
        }

        fn state(&self) -> SessionState {
            self.state
        }
    }

    fn two_reads() -> InstrumentPlan {
        InstrumentPlan::new(
            "daq",
            vec![ReadRequest::single(Modality::Analog, 1.0), ReadRequest::single(Modality::Digital, 1.0)],
        )
    }

    #[tokio::test]
    async fn test_successful_plan_disconnects() {
        let mut device = FlakyDevice::new(None);
        let data = acquire(&mut device, &two_reads()).await.unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[1].modality, Modality::Digital);
        assert_eq!(device.disconnects, 1);
        assert_eq!(device.state(), SessionState::Disconnected);
    }

    #[tokio::test]
    async fn test_failed_read_still_disconnects() {
        let mut device = FlakyDevice::new(Some(1));
        let result = acquire(&mut device, &two_reads()).await;
        assert!(matches!(result, Err(AcquisitionError::ConnectionFailure { .. })));
        assert_eq!(device.disconnects, 1);
        assert!(!device.is_connected());
    }

    #[tokio::test]
    async fn test_failed_connect_still_disconnects() {
        let config = AcquisitionConfig { connect_failure_rate: 1.0, ..AcquisitionConfig::instant(1) };
        let mut session = AcquisitionSession::new(config).unwrap();
        let plan = InstrumentPlan::new(
            "power meter",
            vec![ReadRequest::single(Modality::Analog, 0.1), ReadRequest::single(Modality::Ethernet, 1.0)],
        );

        let result = acquire(&mut session, &plan).await;
        assert_eq!(result, Err(AcquisitionError::ConnectionFailure { modality: Modality::Ethernet }));
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    #[tokio::test]
    async fn test_plan_on_real_session() {
        let mut session = AcquisitionSession::new(AcquisitionConfig::instant(9)).unwrap();
        let plan = InstrumentPlan::new("daq", vec![ReadRequest::new(Modality::Analog, 0.25, 3)]);
        let data = acquire(&mut session, &plan).await.unwrap();
        assert_eq!(data[0].len(), 250);
        assert_eq!(data[0].channel_count(), 3);
        assert_eq!(session.state(), SessionState::Disconnected);
    }
}
