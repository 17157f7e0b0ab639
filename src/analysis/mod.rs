// src/analysis/mod.rs
//! Statistical process control and capability analysis
//!
//! Reduces a [`SampleTable`] to a [`ResultBundle`]: descriptive statistics,
//! control limits, moving-range summaries and Cp/Cpk per tracked parameter,
//! plus the same per row group when the table is grouped. All statistics are
//! computed over the non-missing values only.

pub mod bundle;
pub mod capability;
pub mod control;
pub mod descriptive;

pub use bundle::{GroupAnalysis, ParameterAnalysis, ResultBundle};
pub use capability::{Capability, CapabilityIndices, LimitKind, SpecLimit};
pub use control::{ControlLimits, MovingRangeSummary};
pub use descriptive::{moving_ranges, present_values, DescriptiveStats};

use crate::config::AnalysisConfig;
use crate::table::SampleTable;
use crate::utils::time::current_timestamp_nanos;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// No rows, or no non-missing value for a tracked parameter
    #[error("No data to analyze for '{parameter}'")]
    EmptyDataset { parameter: String },
    #[error("Unknown parameter '{0}'")]
    UnknownParameter(String),
}

/// Specification limit that applies only inside one row group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupLimit {
    pub group: String,
    pub limit: SpecLimit,
}

impl GroupLimit {
    pub fn new(group: impl Into<String>, limit: SpecLimit) -> Self {
        Self { group: group.into(), limit }
    }
}

/// Which parameters to track and the limits to judge them against
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisPlan {
    /// Parameters analyzed over the whole table
    pub parameters: Vec<String>,
    pub spec_limits: Vec<SpecLimit>,
    /// Limits for per-group analysis; every column is analyzed in every group
    pub group_limits: Vec<GroupLimit>,
}

impl AnalysisPlan {
    /// Track every column of `table`, no limits
    pub fn for_table(table: &SampleTable) -> Self {
        Self { parameters: table.columns().to_vec(), ..Self::default() }
    }

    fn limit_for(&self, parameter: &str) -> Option<&LimitKind> {
        self.spec_limits
            .iter()
            .find(|l| l.parameter == parameter)
            .map(|l| &l.kind)
    }

    fn group_limit_for(&self, group: &str, parameter: &str) -> Option<&LimitKind> {
        self.group_limits
            .iter()
            .find(|g| g.group == group && g.limit.parameter == parameter)
            .map(|g| &g.limit.kind)
    }
}

/// Pure reducer from sample tables to result bundles
#[derive(Debug, Clone, Default)]
pub struct StatisticsEngine {
    config: AnalysisConfig,
}

impl StatisticsEngine {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze `table`, stamping the bundle with the current time
    pub fn analyze(&self, table: &SampleTable, plan: &AnalysisPlan) -> Result<ResultBundle, AnalysisError> {
        self.analyze_at(table, plan, current_timestamp_nanos())
    }

    /// Analyze `table` with an explicit analysis timestamp
    pub fn analyze_at(
        &self,
        table: &SampleTable,
        plan: &AnalysisPlan,
        analyzed_at_nanos: u64,
    ) -> Result<ResultBundle, AnalysisError> {
        if table.is_empty() {
            return Err(AnalysisError::EmptyDataset { parameter: "table".to_string() });
        }

        let mut parameters = BTreeMap::new();
        for parameter in &plan.parameters {
            let values = column_values(table, parameter)?;
            let analysis = self.analyze_parameter(parameter, &values, plan.limit_for(parameter))?;
            parameters.insert(parameter.clone(), analysis);
        }

        let mut groups = BTreeMap::new();
        for group in table.groups() {
            let group_table = table.filter_group(group);
            let mut group_parameters = BTreeMap::new();
            for parameter in group_table.columns() {
                let values = column_values(&group_table, parameter)?;
                let limit = plan.group_limit_for(group, parameter);
                group_parameters.insert(parameter.clone(), self.analyze_parameter(parameter, &values, limit)?);
            }
            groups.insert(
                group.to_string(),
                GroupAnalysis {
                    sample_count: group_table.len(),
                    pass_rate: pass_rate(&group_table),
                    parameters: group_parameters,
                },
            );
        }

        let bundle = ResultBundle {
            test_type: table.test_type,
            sample_count: table.len(),
            pass_rate: pass_rate(table),
            parameters,
            groups,
            analyzed_at_nanos,
        };
        tracing::info!(
            samples = bundle.sample_count,
            pass_rate = bundle.pass_rate,
            parameters = bundle.parameters.len(),
            groups = bundle.groups.len(),
            "analysis complete"
        );
        Ok(bundle)
    }

    /// Statistics, control limits, moving range and capability for one value series
    pub fn analyze_parameter(
        &self,
        parameter: &str,
        values: &[Option<f64>],
        limit: Option<&LimitKind>,
    ) -> Result<ParameterAnalysis, AnalysisError> {
        let present = present_values(values);
        let stats = DescriptiveStats::from_values(&present)
            .ok_or_else(|| AnalysisError::EmptyDataset { parameter: parameter.to_string() })?;
        let sigma = self.config.control_sigma;
        let control_limits = ControlLimits::from_stats(&stats, sigma);

        Ok(ParameterAnalysis {
            stats,
            control_limits,
            moving_range: MovingRangeSummary::from_values(values, sigma),
            spec_limit: limit.copied(),
            capability: limit.map(|kind| Capability::compute(&stats, kind)),
            missing_count: values.len() - present.len(),
            out_of_control_count: control_limits.out_of_control_count(&present),
        })
    }
}

fn column_values(table: &SampleTable, parameter: &str) -> Result<Vec<Option<f64>>, AnalysisError> {
    table
        .column(parameter)
        .map_err(|_| AnalysisError::UnknownParameter(parameter.to_string()))
}

fn pass_rate(table: &SampleTable) -> f64 {
    if table.is_empty() {
        0.0
    } else {
        table.pass_count() as f64 / table.len() as f64
    }
}
