//! Burn-in soak: temperature and status line over a long run
//!
//! Temperature comes from the analog DAQ and status from digital I/O on the
//! same session. Supply voltage and current are drawn per row from their
//! nominal distributions.

use crate::acquisition::InstrumentPlan;
use crate::analysis::SpecLimit;
use crate::config::constants::profiles::burnin::*;
use crate::error::TestbenchResult;
use crate::hal::simulation::GaussianNoise;
use crate::hal::{Modality, RawAcquisition, ReadRequest};
use crate::profiles::{empty_table, paired, require_acquisitions, PassCriterion, TestProfile, TestType};
use crate::table::{SampleRow, SampleTable};
use rand::rngs::StdRng;

#[derive(Debug, Clone, Copy, Default)]
pub struct BurnInProfile;

impl BurnInProfile {
    pub fn criterion() -> PassCriterion {
        PassCriterion::at_most("temperature", MAX_TEMPERATURE)
    }
}

impl TestProfile for BurnInProfile {
    fn test_type(&self) -> TestType {
        TestType::BurnIn
    }

    fn instruments(&self, duration_secs: f64) -> Vec<InstrumentPlan> {
        vec![InstrumentPlan::new(
            "burn-in chamber",
            vec![
                ReadRequest::single(Modality::Analog, duration_secs),
                ReadRequest::single(Modality::Digital, duration_secs),
            ],
        )]
    }

    fn columns(&self) -> &'static [&'static str] {
        &["temperature", "status", "voltage", "current"]
    }

    fn spec_limits(&self) -> Vec<SpecLimit> {
        vec![
            SpecLimit::upper_only("temperature", MAX_TEMPERATURE),
            SpecLimit::two_sided("voltage", SUPPLY_VOLTAGE_MIN, SUPPLY_VOLTAGE_MAX),
            SpecLimit::two_sided("current", SUPPLY_CURRENT_MIN, SUPPLY_CURRENT_MAX),
        ]
    }

    /// The status line is recorded but not charted
    fn tracked_parameters(&self) -> Vec<String> {
        vec!["temperature".to_string(), "voltage".to_string(), "current".to_string()]
    }

    fn build_table(&self, acquisitions: &[RawAcquisition], rng: &mut StdRng) -> TestbenchResult<SampleTable> {
        require_acquisitions(acquisitions, 2)?;
        let mut table = empty_table(self)?;
        let criterion = Self::criterion();
        let voltage = GaussianNoise::new(SUPPLY_VOLTAGE_MEAN, SUPPLY_VOLTAGE_SIGMA)?;
        let current = GaussianNoise::new(SUPPLY_CURRENT_MEAN, SUPPLY_CURRENT_SIGMA)?;

        for (timestamp, temperature, status) in paired(&acquisitions[0], &acquisitions[1]) {
            let values = vec![
                temperature,
                status,
                Some(voltage.sample(rng)),
                Some(current.sample(rng)),
            ];
            let pass = criterion.evaluate(table.columns(), &values);
            table.push(SampleRow::new(timestamp, values, pass))?;
        }
        Ok(table)
    }
}
