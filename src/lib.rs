//! SPC-Testbench: synthetic instrument data and process-capability analysis
//!
//! This library simulates production test stations and reduces their output
//! to statistical process control results. It provides:
//!
//! - Simulated acquisition sessions for analog, digital and networked instruments
//! - Per-test profiles mapping raw channels to physical units and verdicts
//! - Descriptive statistics, control limits, moving ranges and Cp/Cpk
//! - Layered configuration from TOML files and the environment
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use spc_testbench::{SystemConfig, Testbench, TestType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut bench = Testbench::new(SystemConfig::default())?;
//!
//!     let report = bench.run(TestType::Parametric, 10.0).await?;
//!     println!("pass rate: {:.1}%", report.bundle.pass_rate * 100.0);
//!     println!("{}", report.bundle.to_json()?);
//!
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod acquisition;
pub mod analysis;
pub mod config;
pub mod error;
pub mod hal;
pub mod profiles;
pub mod table;
pub mod testbench;
pub mod utils;

// Re-export commonly used types for convenience
pub use analysis::{
    AnalysisError, AnalysisPlan, Capability, CapabilityIndices, ControlLimits, DescriptiveStats, LimitKind,
    ResultBundle, SpecLimit, StatisticsEngine,
};
pub use config::{AcquisitionConfig, AnalysisConfig, ConfigLoader, SystemConfig};
pub use error::{TestbenchError, TestbenchResult};
pub use hal::{AcquisitionDevice, AcquisitionError, AcquisitionSession, Modality, RawAcquisition, SessionState};
pub use profiles::{profile_for, PassCriterion, TestProfile, TestType};
pub use table::{Record, SampleRow, SampleTable, TableError};
pub use testbench::{TestReport, Testbench};

pub use utils::{
    time::{current_timestamp_nanos, TimeProvider},
    validation::{ValidationError, ValidationResult},
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: "Synthetic instrument data and SPC capability analysis".to_string(),
        test_types: TestType::ALL.iter().map(|t| t.to_string()).collect(),
    }
}

/// Library version information
#[derive(Debug, Clone)]
pub struct VersionInfo {
    /// Library name
    pub name: String,
    /// Version string
    pub version: String,
    /// Description
    pub description: String,
    /// Supported test types
    pub test_types: Vec<String>,
}
