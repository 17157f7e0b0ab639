//! Supply voltage, current and power window test

use crate::acquisition::InstrumentPlan;
use crate::analysis::SpecLimit;
use crate::config::constants::profiles::parametric::*;
use crate::error::TestbenchResult;
use crate::hal::{Modality, RawAcquisition, ReadRequest};
use crate::profiles::{empty_table, magnitude, paired, require_acquisitions, PassCriterion, TestProfile, TestType};
use crate::table::{SampleRow, SampleTable};
use rand::rngs::StdRng;

#[derive(Debug, Clone, Copy, Default)]
pub struct ParametricProfile;

impl ParametricProfile {
    /// Voltage and current in their windows and power under its ceiling
    pub fn criterion() -> PassCriterion {
        PassCriterion::All(vec![
            PassCriterion::between("voltage", VOLTAGE_MIN_MV, VOLTAGE_MAX_MV),
            PassCriterion::between("current", CURRENT_MIN_MA, CURRENT_MAX_MA),
            PassCriterion::at_most("power", POWER_MAX_MW),
        ])
    }

    /// mW from mV and mA
    pub fn power_mw(voltage_mv: f64, current_ma: f64) -> f64 {
        voltage_mv * current_ma / 1000.0
    }
}

impl TestProfile for ParametricProfile {
    fn test_type(&self) -> TestType {
        TestType::Parametric
    }

    fn instruments(&self, duration_secs: f64) -> Vec<InstrumentPlan> {
        vec![InstrumentPlan::new(
            "supply daq",
            vec![
                ReadRequest::single(Modality::Analog, duration_secs),
                ReadRequest::single(Modality::Analog, duration_secs),
            ],
        )]
    }

    fn columns(&self) -> &'static [&'static str] {
        &["voltage", "current", "power"]
    }

    fn spec_limits(&self) -> Vec<SpecLimit> {
        vec![
            SpecLimit::two_sided("voltage", VOLTAGE_MIN_MV, VOLTAGE_MAX_MV),
            SpecLimit::two_sided("current", CURRENT_MIN_MA, CURRENT_MAX_MA),
            SpecLimit::upper_only("power", POWER_MAX_MW),
        ]
    }

    fn build_table(&self, acquisitions: &[RawAcquisition], _rng: &mut StdRng) -> TestbenchResult<SampleTable> {
        require_acquisitions(acquisitions, 2)?;
        let mut table = empty_table(self)?;
        let criterion = Self::criterion();

        for (timestamp, raw_voltage, raw_current) in paired(&acquisitions[0], &acquisitions[1]) {
            let voltage = magnitude(raw_voltage, VOLTAGE_SCALE);
            let current = magnitude(raw_current, CURRENT_SCALE);
            let power = voltage.zip(current).map(|(v, i)| Self::power_mw(v, i));
            let values = vec![voltage, current, power];
            let pass = criterion.evaluate(table.columns(), &values);
            table.push(SampleRow::new(timestamp, values, pass))?;
        }
        Ok(table)
    }
}
