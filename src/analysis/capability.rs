//! Process capability indices against engineering specification limits

use crate::analysis::descriptive::DescriptiveStats;
use crate::config::constants::analysis::CAPABILITY_SIGMA;
use serde::{Deserialize, Serialize};

/// Shape of a specification limit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LimitKind {
    TwoSided { lower: f64, upper: f64 },
    UpperOnly { upper: f64 },
    LowerOnly { lower: f64 },
}

impl LimitKind {
    /// True when `value` satisfies the limit, bounds inclusive
    pub fn contains(&self, value: f64) -> bool {
        match *self {
            LimitKind::TwoSided { lower, upper } => value >= lower && value <= upper,
            LimitKind::UpperOnly { upper } => value <= upper,
            LimitKind::LowerOnly { lower } => value >= lower,
        }
    }
}

/// Specification limit attached to one named parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecLimit {
    pub parameter: String,
    #[serde(flatten)]
    pub kind: LimitKind,
}

impl SpecLimit {
    pub fn two_sided(parameter: impl Into<String>, lower: f64, upper: f64) -> Self {
        Self { parameter: parameter.into(), kind: LimitKind::TwoSided { lower, upper } }
    }

    pub fn upper_only(parameter: impl Into<String>, upper: f64) -> Self {
        Self { parameter: parameter.into(), kind: LimitKind::UpperOnly { upper } }
    }

    pub fn lower_only(parameter: impl Into<String>, lower: f64) -> Self {
        Self { parameter: parameter.into(), kind: LimitKind::LowerOnly { lower } }
    }

    /// Symmetric tolerance band around a nominal value, e.g. 5% of 1000 Ω
    pub fn tolerance(parameter: impl Into<String>, nominal: f64, fraction: f64) -> Self {
        let delta = (nominal * fraction).abs();
        Self::two_sided(parameter, nominal - delta, nominal + delta)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapabilityIndices {
    pub cp: f64,
    pub cpk: f64,
}

/// Capability outcome. A zero-spread process has no defined index, and that is
/// reported as [`Capability::Undefined`] rather than an infinite or NaN value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Indices(CapabilityIndices),
    Undefined,
}

impl Capability {
    /// Cp/Cpk of `stats` against `kind`.
    ///
    /// Two-sided Cp is the nearer-limit margin over 3σ, matching Cpk when the
    /// process is centered and smaller otherwise.
    pub fn compute(stats: &DescriptiveStats, kind: &LimitKind) -> Self {
        let spread = CAPABILITY_SIGMA * stats.std;
        if !spread.is_finite() || spread <= 0.0 {
            return Capability::Undefined;
        }

        let mean = stats.mean;
        let indices = match *kind {
            LimitKind::TwoSided { lower, upper } => {
                let cp = (upper - mean).min(mean - lower) / spread;
                let cpk = ((upper - mean) / spread).min((mean - lower) / spread);
                CapabilityIndices { cp, cpk }
            }
            LimitKind::UpperOnly { upper } => {
                let c = (upper - mean) / spread;
                CapabilityIndices { cp: c, cpk: c }
            }
            LimitKind::LowerOnly { lower } => {
                let c = (mean - lower) / spread;
                CapabilityIndices { cp: c, cpk: c }
            }
        };

        if indices.cp.is_finite() && indices.cpk.is_finite() {
            Capability::Indices(indices)
        } else {
            Capability::Undefined
        }
    }

    pub fn indices(&self) -> Option<CapabilityIndices> {
        match self {
            Capability::Indices(indices) => Some(*indices),
            Capability::Undefined => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Capability::Undefined)
    }
}
