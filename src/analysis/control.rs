//! Shewhart control limits for individual values and their moving ranges

use crate::analysis::descriptive::{moving_ranges, DescriptiveStats};
use serde::{Deserialize, Serialize};

/// Center line plus upper and lower control limits.
///
/// Invariant: `lcl <= center_line <= ucl` whenever the inputs are finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlLimits {
    pub center_line: f64,
    pub ucl: f64,
    pub lcl: f64,
}

impl ControlLimits {
    /// `center = mean`, limits at `mean ± sigma_multiplier·std`
    pub fn from_stats(stats: &DescriptiveStats, sigma_multiplier: f64) -> Self {
        let half_width = sigma_multiplier * stats.std;
        Self {
            center_line: stats.mean,
            ucl: stats.mean + half_width,
            lcl: stats.mean - half_width,
        }
    }

    /// True when `value` lies within the limits, inclusive
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lcl && value <= self.ucl
    }

    /// Number of values strictly outside the limits
    pub fn out_of_control_count(&self, values: &[f64]) -> usize {
        values.iter().filter(|&&v| !self.contains(v)).count()
    }
}

/// Moving-range (window 2) series summary: statistics and limits of |x[i] − x[i−1]|.
/// Without lost samples `stats.count` is one less than the number of source values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovingRangeSummary {
    pub stats: DescriptiveStats,
    pub control_limits: ControlLimits,
}

impl MovingRangeSummary {
    /// `None` when no two adjacent samples are both present
    pub fn from_values(values: &[Option<f64>], sigma_multiplier: f64) -> Option<Self> {
        let ranges = moving_ranges(values);
        let stats = DescriptiveStats::from_values(&ranges)?;
        let control_limits = ControlLimits::from_stats(&stats, sigma_multiplier);
        Some(Self { stats, control_limits })
    }
}
