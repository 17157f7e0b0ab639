//! Dielectric withstand (HiPot) test: applied kV and leakage mA

use crate::acquisition::InstrumentPlan;
use crate::analysis::SpecLimit;
use crate::config::constants::profiles::hipot::*;
use crate::error::TestbenchResult;
use crate::hal::{Modality, RawAcquisition, ReadRequest};
use crate::profiles::{empty_table, magnitude, paired, require_acquisitions, PassCriterion, TestProfile, TestType};
use crate::table::{SampleRow, SampleTable};
use rand::rngs::StdRng;

#[derive(Debug, Clone, Copy, Default)]
pub struct HiPotProfile;

impl HiPotProfile {
    /// Leakage strictly under the limit
    pub fn criterion() -> PassCriterion {
        PassCriterion::below("current", LEAKAGE_LIMIT_MA)
    }
}

impl TestProfile for HiPotProfile {
    fn test_type(&self) -> TestType {
        TestType::HiPot
    }

    fn instruments(&self, duration_secs: f64) -> Vec<InstrumentPlan> {
        vec![InstrumentPlan::new(
            "hipot daq",
            vec![
                ReadRequest::single(Modality::Analog, duration_secs),
                ReadRequest::single(Modality::Analog, duration_secs),
            ],
        )]
    }

    fn columns(&self) -> &'static [&'static str] {
        &["voltage", "current"]
    }

    fn spec_limits(&self) -> Vec<SpecLimit> {
        vec![
            SpecLimit::two_sided("voltage", VOLTAGE_MIN_KV, VOLTAGE_MAX_KV),
            SpecLimit::upper_only("current", LEAKAGE_LIMIT_MA),
        ]
    }

    fn build_table(&self, acquisitions: &[RawAcquisition], _rng: &mut StdRng) -> TestbenchResult<SampleTable> {
        require_acquisitions(acquisitions, 2)?;
        let mut table = empty_table(self)?;
        let criterion = Self::criterion();

        for (timestamp, raw_voltage, raw_current) in paired(&acquisitions[0], &acquisitions[1]) {
            let values = vec![magnitude(raw_voltage, VOLTAGE_SCALE), magnitude(raw_current, CURRENT_SCALE)];
            let pass = criterion.evaluate(table.columns(), &values);
            table.push(SampleRow::new(timestamp, values, pass))?;
        }
        Ok(table)
    }
}
