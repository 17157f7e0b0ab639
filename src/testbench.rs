// src/testbench.rs
//! Acquire, transform and analyze one test run
//!
//! A [`Testbench`] owns the run's configuration and random source. Every
//! instrument gets its own session, seeded from the testbench, so a seeded
//! testbench reproduces its tables exactly.

use crate::acquisition::acquire;
use crate::analysis::{AnalysisPlan, ResultBundle, StatisticsEngine};
use crate::config::{ConfigError, ConfigLoader, SystemConfig};
use crate::error::TestbenchResult;
use crate::hal::AcquisitionSession;
use crate::profiles::{planned_reads, profile_for, TestProfile, TestType};
use crate::table::SampleTable;
use crate::utils::time::{SystemTimeProvider, TimeProvider};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Table and analysis of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestReport {
    pub table: SampleTable,
    pub bundle: ResultBundle,
}

pub struct Testbench {
    config: SystemConfig,
    rng: StdRng,
    engine: StatisticsEngine,
    time_provider: Arc<dyn TimeProvider>,
}

impl std::fmt::Debug for Testbench {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Testbench")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Testbench {
    /// Seeds from `config.acquisition.seed` when present, entropy otherwise
    pub fn new(config: SystemConfig) -> TestbenchResult<Self> {
        config.validate().map_err(ConfigError::from)?;
        let rng = match config.acquisition.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            engine: StatisticsEngine::new(config.analysis.clone()),
            config,
            rng,
            time_provider: Arc::new(SystemTimeProvider),
        })
    }

    /// Build from the default config file and `TESTBENCH_` environment overrides
    pub fn from_environment() -> TestbenchResult<Self> {
        Self::new(ConfigLoader::new().load()?)
    }

    /// Replace the clock used for sample timestamps
    pub fn with_time_provider(mut self, time_provider: Arc<dyn TimeProvider>) -> Self {
        self.time_provider = time_provider;
        self
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// Acquire and transform `duration_secs` of data with the default profile for `test_type`
    pub async fn generate_test_data(&mut self, test_type: TestType, duration_secs: f64) -> TestbenchResult<SampleTable> {
        let profile = profile_for(test_type);
        self.generate_with_profile(profile.as_ref(), duration_secs).await
    }

    /// Run every instrument plan of `profile` in order, then build its table.
    ///
    /// The first acquisition failure aborts the run; its session has already
    /// been disconnected.
    pub async fn generate_with_profile(
        &mut self,
        profile: &dyn TestProfile,
        duration_secs: f64,
    ) -> TestbenchResult<SampleTable> {
        let plans = profile.instruments(duration_secs);
        let mut acquisitions = Vec::with_capacity(planned_reads(&plans));
        for plan in plans {
            let mut session = AcquisitionSession::with_seed(self.config.acquisition.clone(), self.rng.gen())?
                .with_time_provider(self.time_provider.clone());
            acquisitions.extend(acquire(&mut session, &plan).await?);
        }

        let table = profile.build_table(&acquisitions, &mut self.rng)?;
        tracing::info!(
            test_type = %profile.test_type(),
            rows = table.len(),
            passed = table.pass_count(),
            "generated test data"
        );
        Ok(table)
    }

    /// Analyze `table` against the limits of the profile that produced it.
    /// A table without a test type is analyzed column by column without limits.
    pub fn analyze_test_data(&self, table: &SampleTable) -> TestbenchResult<ResultBundle> {
        let plan = match table.test_type {
            Some(test_type) => profile_for(test_type).analysis_plan(),
            None => AnalysisPlan::for_table(table),
        };
        Ok(self.engine.analyze(table, &plan)?)
    }

    pub fn analyze_with_profile(&self, table: &SampleTable, profile: &dyn TestProfile) -> TestbenchResult<ResultBundle> {
        Ok(self.engine.analyze(table, &profile.analysis_plan())?)
    }

    /// Generate then analyze
    pub async fn run(&mut self, test_type: TestType, duration_secs: f64) -> TestbenchResult<TestReport> {
        let table = self.generate_test_data(test_type, duration_secs).await?;
        let bundle = self.analyze_test_data(&table)?;
        Ok(TestReport { table, bundle })
    }
}
