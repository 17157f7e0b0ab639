// src/error.rs
//! Unified error type for testbench runs
//!
//! Each layer keeps its own error enum; this one wraps them so a caller of
//! [`Testbench`](crate::Testbench) handles a single type. Degenerate
//! capability is not an error and never appears here.

use crate::analysis::AnalysisError;
use crate::config::ConfigError;
use crate::hal::AcquisitionError;
use crate::table::TableError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TestbenchError {
    #[error("Acquisition failed: {0}")]
    Acquisition(#[from] AcquisitionError),

    #[error("Analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Sample table error: {0}")]
    Table(#[from] TableError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Unknown test type: {0}")]
    UnknownTestType(String),

    /// A profile received fewer acquisitions than its instrument plan produces
    #[error("Expected {expected} acquisitions, got {actual}")]
    IncompleteAcquisition { expected: usize, actual: usize },
}

impl TestbenchError {
    /// Simulated transient failures; an external orchestrator may retry these
    pub fn is_transient(&self) -> bool {
        matches!(self, TestbenchError::Acquisition(AcquisitionError::ConnectionFailure { .. }))
    }
}

pub type TestbenchResult<T> = Result<T, TestbenchError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::Modality;

    #[test]
    fn test_conversions_keep_source() {
        let err: TestbenchError = AcquisitionError::NotConnected { modality: Modality::Digital }.into();
        assert_eq!(err.to_string(), "Acquisition failed: Session is not connected to a digital source");

        let err: TestbenchError = AnalysisError::EmptyDataset { parameter: "power".to_string() }.into();
        assert!(matches!(err, TestbenchError::Analysis(_)));
    }

    #[test]
    fn test_only_connection_failures_are_transient() {
        let transient: TestbenchError = AcquisitionError::ConnectionFailure { modality: Modality::Ethernet }.into();
        assert!(transient.is_transient());
        assert!(!TestbenchError::UnknownTestType("x".to_string()).is_transient());
    }
}
