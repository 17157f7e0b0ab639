//! In-circuit test: one row per test point, grouped by measurement kind
//!
//! The DAQ session times the probe sequence; each point's value is drawn from
//! its component's nominal distribution.

use crate::acquisition::InstrumentPlan;
use crate::analysis::{GroupLimit, SpecLimit};
use crate::config::constants::profiles::ict::*;
use crate::error::TestbenchResult;
use crate::hal::simulation::GaussianNoise;
use crate::hal::{Modality, RawAcquisition, ReadRequest};
use crate::profiles::{empty_table, require_acquisitions, PassCriterion, TestProfile, TestType};
use crate::table::{SampleRow, SampleTable};
use rand::rngs::StdRng;

pub const CONTINUITY: &str = "continuity";
pub const RESISTOR: &str = "resistor";
pub const CAPACITOR: &str = "capacitor";
pub const POWER: &str = "power";

/// Measurement kind shared by a set of test points
#[derive(Debug, Clone)]
struct PointGroup {
    name: &'static str,
    points: &'static [&'static str],
    mean: f64,
    sigma: f64,
    criterion: PassCriterion,
    limit: SpecLimit,
}

fn point_groups() -> [PointGroup; 4] {
    [
        PointGroup {
            name: CONTINUITY,
            points: &CONTINUITY_POINTS,
            mean: CONTINUITY_MEAN_OHM,
            sigma: CONTINUITY_SIGMA_OHM,
            criterion: PassCriterion::below("value", CONTINUITY_LIMIT_OHM),
            limit: SpecLimit::upper_only("value", CONTINUITY_LIMIT_OHM),
        },
        PointGroup {
            name: RESISTOR,
            points: &RESISTOR_POINTS,
            mean: RESISTOR_NOMINAL_OHM,
            sigma: RESISTOR_SIGMA_OHM,
            criterion: PassCriterion::within("value", RESISTOR_NOMINAL_OHM, RESISTOR_TOLERANCE),
            limit: SpecLimit::tolerance("value", RESISTOR_NOMINAL_OHM, RESISTOR_TOLERANCE),
        },
        PointGroup {
            name: CAPACITOR,
            points: &CAPACITOR_POINTS,
            mean: CAPACITOR_NOMINAL_UF,
            sigma: CAPACITOR_SIGMA_UF,
            criterion: PassCriterion::within("value", CAPACITOR_NOMINAL_UF, CAPACITOR_TOLERANCE),
            limit: SpecLimit::tolerance("value", CAPACITOR_NOMINAL_UF, CAPACITOR_TOLERANCE),
        },
        PointGroup {
            name: POWER,
            points: &POWER_POINTS,
            mean: POWER_NOMINAL_V,
            sigma: POWER_NOMINAL_V * POWER_SIGMA_FRACTION,
            criterion: PassCriterion::within("value", POWER_NOMINAL_V, POWER_TOLERANCE),
            limit: SpecLimit::tolerance("value", POWER_NOMINAL_V, POWER_TOLERANCE),
        },
    ]
}

/// Total number of probed points
pub fn point_count() -> usize {
    point_groups().iter().map(|g| g.points.len()).sum()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IctProfile;

impl TestProfile for IctProfile {
    fn test_type(&self) -> TestType {
        TestType::Ict
    }

    /// One analog sample per test point; the run duration does not apply
    fn instruments(&self, _duration_secs: f64) -> Vec<InstrumentPlan> {
        let rate = Modality::Analog.sampling_rate_hz() as f64;
        // Half a sample of slack so truncation keeps every point
        let probe_secs = (point_count() as f64 + 0.5) / rate;
        vec![InstrumentPlan::new("ict fixture", vec![ReadRequest::single(Modality::Analog, probe_secs)])]
    }

    fn columns(&self) -> &'static [&'static str] {
        &["value"]
    }

    fn spec_limits(&self) -> Vec<SpecLimit> {
        Vec::new()
    }

    fn group_limits(&self) -> Vec<GroupLimit> {
        point_groups()
            .into_iter()
            .map(|g| GroupLimit::new(g.name, g.limit))
            .collect()
    }

    /// Values of different kinds share one column; only per-group analysis is meaningful
    fn tracked_parameters(&self) -> Vec<String> {
        Vec::new()
    }

    fn build_table(&self, acquisitions: &[RawAcquisition], rng: &mut StdRng) -> TestbenchResult<SampleTable> {
        require_acquisitions(acquisitions, 1)?;
        let timestamps = &acquisitions[0].timestamps;
        let mut table = empty_table(self)?;
        let mut index = 0;

        for group in point_groups() {
            let noise = GaussianNoise::new(group.mean, group.sigma)?;
            for point in group.points {
                let timestamp = timestamps.get(index).or(timestamps.last()).copied().unwrap_or(0);
                let values = vec![Some(noise.sample(rng))];
                let pass = group.criterion.evaluate(table.columns(), &values);
                table.push(SampleRow::new(timestamp, values, pass).with_group(group.name, *point))?;
                index += 1;
            }
        }
        tracing::debug!(points = table.len(), passed = table.pass_count(), "ict probe sequence complete");
        Ok(table)
    }
}
