//! Analysis output handed to persistence and visualization consumers

use crate::analysis::capability::{Capability, LimitKind};
use crate::analysis::control::{ControlLimits, MovingRangeSummary};
use crate::analysis::descriptive::DescriptiveStats;
use crate::profiles::TestType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything computed for one tracked parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterAnalysis {
    pub stats: DescriptiveStats,
    pub control_limits: ControlLimits,
    /// Absent when fewer than two values were present
    pub moving_range: Option<MovingRangeSummary>,
    pub spec_limit: Option<LimitKind>,
    /// Absent when the parameter has no specification limit
    pub capability: Option<Capability>,
    /// Samples lost in acquisition and excluded from the statistics
    pub missing_count: usize,
    /// Present values outside the control limits
    pub out_of_control_count: usize,
}

/// Pass rate and parameter analysis for one row group (ICT category)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAnalysis {
    pub sample_count: usize,
    pub pass_rate: f64,
    pub parameters: BTreeMap<String, ParameterAnalysis>,
}

/// Immutable result of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultBundle {
    pub test_type: Option<TestType>,
    pub sample_count: usize,
    /// Fraction of rows with a passing verdict
    pub pass_rate: f64,
    pub parameters: BTreeMap<String, ParameterAnalysis>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub groups: BTreeMap<String, GroupAnalysis>,
    /// Nanoseconds since the Unix epoch
    pub analyzed_at_nanos: u64,
}

impl ResultBundle {
    pub fn parameter(&self, name: &str) -> Option<&ParameterAnalysis> {
        self.parameters.get(name)
    }

    pub fn group(&self, name: &str) -> Option<&GroupAnalysis> {
        self.groups.get(name)
    }

    /// Structured document form, keyed by parameter name
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
