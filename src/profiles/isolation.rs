//! Insulation resistance test
//!
//! Two analog reads on one DAQ: resistance in MΩ and test voltage in V.

use crate::acquisition::InstrumentPlan;
use crate::analysis::SpecLimit;
use crate::config::constants::profiles::isolation::*;
use crate::error::TestbenchResult;
use crate::hal::{Modality, RawAcquisition, ReadRequest};
use crate::profiles::{empty_table, magnitude, paired, require_acquisitions, PassCriterion, TestProfile, TestType};
use crate::table::{SampleRow, SampleTable};
use rand::rngs::StdRng;

#[derive(Debug, Clone, Copy, Default)]
pub struct IsolationProfile;

impl IsolationProfile {
    pub fn criterion() -> PassCriterion {
        PassCriterion::at_least("resistance", MIN_RESISTANCE_MOHM)
    }
}

impl TestProfile for IsolationProfile {
    fn test_type(&self) -> TestType {
        TestType::Isolation
    }

    fn instruments(&self, duration_secs: f64) -> Vec<InstrumentPlan> {
        vec![InstrumentPlan::new(
            "resistance/voltage daq",
            vec![
                ReadRequest::single(Modality::Analog, duration_secs),
                ReadRequest::single(Modality::Analog, duration_secs),
            ],
        )]
    }

    fn columns(&self) -> &'static [&'static str] {
        &["resistance", "voltage"]
    }

    fn spec_limits(&self) -> Vec<SpecLimit> {
        vec![SpecLimit::lower_only("resistance", MIN_RESISTANCE_MOHM)]
    }

    fn build_table(&self, acquisitions: &[RawAcquisition], _rng: &mut StdRng) -> TestbenchResult<SampleTable> {
        require_acquisitions(acquisitions, 2)?;
        let mut table = empty_table(self)?;
        let criterion = Self::criterion();

        for (timestamp, raw_resistance, raw_voltage) in paired(&acquisitions[0], &acquisitions[1]) {
            let values = vec![
                magnitude(raw_resistance, RESISTANCE_SCALE),
                magnitude(raw_voltage, VOLTAGE_SCALE),
            ];
            let pass = criterion.evaluate(table.columns(), &values);
            table.push(SampleRow::new(timestamp, values, pass))?;
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::test_support::analog;
    use rand::SeedableRng;

    #[test]
    fn test_negative_raw_scales_to_positive_resistance() {
        let resistance = analog(&[Some(-0.0002), Some(0.00005), None]);
        let voltage = analog(&[Some(0.5), Some(-0.5), Some(0.5)]);
        let table = IsolationProfile
            .build_table(&[resistance, voltage], &mut StdRng::seed_from_u64(0))
            .unwrap();

        let rows = table.rows();
        assert!((rows[0].values[0].unwrap() - 200.0).abs() < 1e-9);
        assert!(rows[0].pass_fail);
        assert!((rows[1].values[0].unwrap() - 50.0).abs() < 1e-9);
        assert!(!rows[1].pass_fail);
        assert_eq!(rows[1].values[1], Some(500.0));
        assert_eq!(rows[2].values[0], None);
        assert!(!rows[2].pass_fail);
        assert_eq!(table.test_type, Some(TestType::Isolation));
    }

    #[test]
    fn test_missing_acquisition_is_reported() {
        let result = IsolationProfile.build_table(&[analog(&[Some(1.0)])], &mut StdRng::seed_from_u64(0));
        assert!(result.is_err());
    }
}
