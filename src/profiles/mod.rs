// src/profiles/mod.rs
//! Test profiles: per-test instrument plans, unit scaling, limits and verdicts
//!
//! A profile turns raw channel arrays into a [`SampleTable`] in physical units.
//! Scaling applies `abs()` first wherever the source is sign-symmetric but the
//! physical quantity is non-negative.

pub mod burnin;
pub mod hipot;
pub mod ict;
pub mod isolation;
pub mod laser;
pub mod parametric;

pub use burnin::BurnInProfile;
pub use hipot::HiPotProfile;
pub use ict::IctProfile;
pub use isolation::IsolationProfile;
pub use laser::{LaserConnection, LaserProfile};
pub use parametric::ParametricProfile;

use crate::acquisition::InstrumentPlan;
use crate::analysis::{AnalysisPlan, GroupLimit, SpecLimit};
use crate::error::{TestbenchError, TestbenchResult};
use crate::hal::RawAcquisition;
use crate::table::SampleTable;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported production tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    Isolation,
    Parametric,
    HiPot,
    BurnIn,
    Laser,
    Ict,
}

impl TestType {
    pub const ALL: [TestType; 6] = [
        TestType::Isolation,
        TestType::Parametric,
        TestType::HiPot,
        TestType::BurnIn,
        TestType::Laser,
        TestType::Ict,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TestType::Isolation => "isolation",
            TestType::Parametric => "parametric",
            TestType::HiPot => "hipot",
            TestType::BurnIn => "burnin",
            TestType::Laser => "laser",
            TestType::Ict => "ict",
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestType {
    type Err = TestbenchError;

    /// Case-insensitive; `-` and `_` are ignored so "burn-in" and "hi_pot" parse
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        TestType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| TestbenchError::UnknownTestType(s.to_string()))
    }
}

/// Boolean pass predicate over named row values.
///
/// A missing or unknown value fails every comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassCriterion {
    /// `value >= limit`
    AtLeast { parameter: String, limit: f64 },
    /// `value <= limit`
    AtMost { parameter: String, limit: f64 },
    /// `value < limit`
    Below { parameter: String, limit: f64 },
    /// `lower <= value <= upper`
    Between { parameter: String, lower: f64, upper: f64 },
    All(Vec<PassCriterion>),
    Any(Vec<PassCriterion>),
}

impl PassCriterion {
    pub fn at_least(parameter: &str, limit: f64) -> Self {
        PassCriterion::AtLeast { parameter: parameter.to_string(), limit }
    }

    pub fn at_most(parameter: &str, limit: f64) -> Self {
        PassCriterion::AtMost { parameter: parameter.to_string(), limit }
    }

    pub fn below(parameter: &str, limit: f64) -> Self {
        PassCriterion::Below { parameter: parameter.to_string(), limit }
    }

    pub fn between(parameter: &str, lower: f64, upper: f64) -> Self {
        PassCriterion::Between { parameter: parameter.to_string(), lower, upper }
    }

    /// `|value − nominal| / nominal <= fraction`
    pub fn within(parameter: &str, nominal: f64, fraction: f64) -> Self {
        let delta = (nominal * fraction).abs();
        Self::between(parameter, nominal - delta, nominal + delta)
    }

    pub fn evaluate(&self, columns: &[String], values: &[Option<f64>]) -> bool {
        let lookup = |parameter: &str| {
            columns
                .iter()
                .position(|c| c == parameter)
                .and_then(|i| values.get(i).copied().flatten())
        };

        match self {
            PassCriterion::AtLeast { parameter, limit } => lookup(parameter).is_some_and(|v| v >= *limit),
            PassCriterion::AtMost { parameter, limit } => lookup(parameter).is_some_and(|v| v <= *limit),
            PassCriterion::Below { parameter, limit } => lookup(parameter).is_some_and(|v| v < *limit),
            PassCriterion::Between { parameter, lower, upper } => {
                lookup(parameter).is_some_and(|v| v >= *lower && v <= *upper)
            }
            PassCriterion::All(criteria) => criteria.iter().all(|c| c.evaluate(columns, values)),
            PassCriterion::Any(criteria) => criteria.iter().any(|c| c.evaluate(columns, values)),
        }
    }
}

/// Mapping from raw acquisitions to a verdict-tagged table for one test type
pub trait TestProfile: Send + Sync {
    fn test_type(&self) -> TestType;

    /// Instrument sessions and reads for a run of `duration_secs`.
    /// Acquisitions reach [`build_table`](Self::build_table) flattened in plan order.
    fn instruments(&self, duration_secs: f64) -> Vec<InstrumentPlan>;

    fn columns(&self) -> &'static [&'static str];

    fn spec_limits(&self) -> Vec<SpecLimit>;

    fn group_limits(&self) -> Vec<GroupLimit> {
        Vec::new()
    }

    /// Parameters analyzed over the whole table
    fn tracked_parameters(&self) -> Vec<String> {
        self.columns().iter().map(|c| c.to_string()).collect()
    }

    fn analysis_plan(&self) -> AnalysisPlan {
        AnalysisPlan {
            parameters: self.tracked_parameters(),
            spec_limits: self.spec_limits(),
            group_limits: self.group_limits(),
        }
    }

    /// Scale raw values to physical units and judge each row.
    /// `rng` feeds values a profile derives rather than acquires.
    fn build_table(&self, acquisitions: &[RawAcquisition], rng: &mut StdRng) -> TestbenchResult<SampleTable>;
}

/// Default profile for a test type; laser uses networked instruments
pub fn profile_for(test_type: TestType) -> Box<dyn TestProfile> {
    match test_type {
        TestType::Isolation => Box::new(IsolationProfile),
        TestType::Parametric => Box::new(ParametricProfile),
        TestType::HiPot => Box::new(HiPotProfile),
        TestType::BurnIn => Box::new(BurnInProfile),
        TestType::Laser => Box::new(LaserProfile::default()),
        TestType::Ict => Box::new(IctProfile),
    }
}

/// Number of acquisitions `plans` produce
pub(crate) fn planned_reads(plans: &[InstrumentPlan]) -> usize {
    plans.iter().map(|p| p.reads.len()).sum()
}

pub(crate) fn require_acquisitions(acquisitions: &[RawAcquisition], expected: usize) -> TestbenchResult<()> {
    if acquisitions.len() < expected {
        return Err(TestbenchError::IncompleteAcquisition { expected, actual: acquisitions.len() });
    }
    Ok(())
}

pub(crate) fn empty_table(profile: &dyn TestProfile) -> TestbenchResult<SampleTable> {
    Ok(SampleTable::new(profile.columns().iter().copied())?.for_test(profile.test_type()))
}

/// First channel of an acquisition, empty when the read had no channels
pub(crate) fn first_channel(acquisition: &RawAcquisition) -> &[Option<f64>] {
    acquisition.channel(0).unwrap_or(&[])
}

/// Rows of two single-channel reads zipped in acquisition order, timed by the first
pub(crate) fn paired<'a>(
    first: &'a RawAcquisition,
    second: &'a RawAcquisition,
) -> impl Iterator<Item = (u64, Option<f64>, Option<f64>)> + 'a {
    first
        .timestamps
        .iter()
        .zip(first_channel(first))
        .zip(first_channel(second))
        .map(|((t, a), b)| (*t, *a, *b))
}

/// `|raw|·scale`, preserving a missing marker
pub(crate) fn magnitude(raw: Option<f64>, scale: f64) -> Option<f64> {
    raw.map(|r| r.abs() * scale)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::hal::{Modality, RawAcquisition};

    /// Single-channel analog acquisition with timestamps 0, 1ms, 2ms, ...
    pub fn analog(values: &[Option<f64>]) -> RawAcquisition {
        acquisition(Modality::Analog, values)
    }

    pub fn acquisition(modality: Modality, values: &[Option<f64>]) -> RawAcquisition {
        let period = 1_000_000_000 / modality.sampling_rate_hz() as u64;
        RawAcquisition {
            modality,
            sampling_rate_hz: modality.sampling_rate_hz(),
            timestamps: (0..values.len() as u64).map(|i| i * period).collect(),
            channels: vec![values.to_vec()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<String> {
        vec!["voltage".to_string(), "current".to_string()]
    }

    #[test]
    fn test_test_type_parsing() {
        assert_eq!("HiPot".parse::<TestType>().unwrap(), TestType::HiPot);
        assert_eq!("burn-in".parse::<TestType>().unwrap(), TestType::BurnIn);
        assert_eq!("ICT".parse::<TestType>().unwrap(), TestType::Ict);
        assert!(matches!("vibration".parse::<TestType>(), Err(TestbenchError::UnknownTestType(_))));
        for test_type in TestType::ALL {
            assert_eq!(test_type.to_string().parse::<TestType>().unwrap(), test_type);
        }
    }

    #[test]
    fn test_comparisons() {
        let values = [Some(3300.0), Some(500.0)];
        assert!(PassCriterion::at_least("voltage", 3300.0).evaluate(&columns(), &values));
        assert!(PassCriterion::at_most("current", 500.0).evaluate(&columns(), &values));
        assert!(!PassCriterion::below("current", 500.0).evaluate(&columns(), &values));
        assert!(PassCriterion::between("voltage", 3200.0, 3400.0).evaluate(&columns(), &values));
        assert!(PassCriterion::within("current", 480.0, 0.05).evaluate(&columns(), &values));
    }

    #[test]
    fn test_missing_value_fails() {
        let values = [None, Some(500.0)];
        assert!(!PassCriterion::at_most("voltage", f64::MAX).evaluate(&columns(), &values));
        assert!(!PassCriterion::at_least("power", 0.0).evaluate(&columns(), &values));
    }

    #[test]
    fn test_combinators() {
        let values = [Some(3500.0), Some(500.0)];
        let voltage_ok = PassCriterion::between("voltage", 3200.0, 3400.0);
        let current_ok = PassCriterion::between("current", 450.0, 550.0);
        assert!(!PassCriterion::All(vec![voltage_ok.clone(), current_ok.clone()]).evaluate(&columns(), &values));
        assert!(PassCriterion::Any(vec![voltage_ok, current_ok]).evaluate(&columns(), &values));
        assert!(PassCriterion::All(Vec::new()).evaluate(&columns(), &values));
        assert!(!PassCriterion::Any(Vec::new()).evaluate(&columns(), &values));
    }

    #[test]
    fn test_every_profile_matches_its_type() {
        for test_type in TestType::ALL {
            let profile = profile_for(test_type);
            assert_eq!(profile.test_type(), test_type);
            assert!(!profile.columns().is_empty());
            assert!(planned_reads(&profile.instruments(1.0)) > 0);
        }
    }
}
