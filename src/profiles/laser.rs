//! Laser output profile: optical power and wavelength
//!
//! Measured either by two networked instruments (power meter and wavelength
//! analyzer, each its own session) or by two analog DAQ reads.

use crate::acquisition::InstrumentPlan;
use crate::analysis::SpecLimit;
use crate::config::constants::profiles::laser::*;
use crate::error::TestbenchResult;
use crate::hal::{Modality, RawAcquisition, ReadRequest};
use crate::profiles::{empty_table, paired, require_acquisitions, PassCriterion, TestProfile, TestType};
use crate::table::{SampleRow, SampleTable};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaserConnection {
    #[default]
    Ethernet,
    Daq,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LaserProfile {
    pub connection: LaserConnection,
}

impl LaserProfile {
    pub fn new(connection: LaserConnection) -> Self {
        Self { connection }
    }

    pub fn criterion() -> PassCriterion {
        PassCriterion::All(vec![
            PassCriterion::between("power", POWER_MIN_MW, POWER_MAX_MW),
            PassCriterion::between("wavelength", WAVELENGTH_MIN_NM, WAVELENGTH_MAX_NM),
        ])
    }
}

impl TestProfile for LaserProfile {
    fn test_type(&self) -> TestType {
        TestType::Laser
    }

    fn instruments(&self, duration_secs: f64) -> Vec<InstrumentPlan> {
        match self.connection {
            LaserConnection::Ethernet => vec![
                InstrumentPlan::new("power meter", vec![ReadRequest::single(Modality::Ethernet, duration_secs)]),
                InstrumentPlan::new(
                    "wavelength analyzer",
                    vec![ReadRequest::single(Modality::Ethernet, duration_secs)],
                ),
            ],
            LaserConnection::Daq => vec![InstrumentPlan::new(
                "laser daq",
                vec![
                    ReadRequest::single(Modality::Analog, duration_secs),
                    ReadRequest::single(Modality::Analog, duration_secs),
                ],
            )],
        }
    }

    fn columns(&self) -> &'static [&'static str] {
        &["power", "wavelength"]
    }

    fn spec_limits(&self) -> Vec<SpecLimit> {
        vec![
            SpecLimit::two_sided("power", POWER_MIN_MW, POWER_MAX_MW),
            SpecLimit::two_sided("wavelength", WAVELENGTH_MIN_NM, WAVELENGTH_MAX_NM),
        ]
    }

    /// Affine scaling, no `abs()`: both readings are offset around a positive center
    fn build_table(&self, acquisitions: &[RawAcquisition], _rng: &mut StdRng) -> TestbenchResult<SampleTable> {
        require_acquisitions(acquisitions, 2)?;
        let mut table = empty_table(self)?;
        let criterion = Self::criterion();

        for (timestamp, raw_power, raw_wavelength) in paired(&acquisitions[0], &acquisitions[1]) {
            let values = vec![
                raw_power.map(|r| r * POWER_GAIN + POWER_OFFSET_MW),
                raw_wavelength.map(|r| r * WAVELENGTH_GAIN + WAVELENGTH_OFFSET_NM),
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
    use crate::profiles::test_support::acquisition;
    use rand::SeedableRng;

    #[test]
    fn test_wavelength_comes_from_its_own_instrument() {
        let power = acquisition(Modality::Ethernet, &[Some(0.5), Some(0.5)]);
        let wavelength = acquisition(Modality::Ethernet, &[Some(0.0), Some(1.5)]);
        let table = LaserProfile::default()
            .build_table(&[power, wavelength], &mut StdRng::seed_from_u64(0))
            .unwrap();

        let rows = table.rows();
        assert_eq!(rows[0].values, vec![Some(80.0), Some(825.0)]);
        assert!(rows[0].pass_fail);
        assert_eq!(rows[1].values[1], Some(862.5));
        assert!(!rows[1].pass_fail);
    }

    #[test]
    fn test_lost_packet_fails_row() {
        let power = acquisition(Modality::Ethernet, &[None]);
        let wavelength = acquisition(Modality::Ethernet, &[Some(0.0)]);
        let table = LaserProfile::default()
            .build_table(&[power, wavelength], &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert_eq!(table.rows()[0].values[0], None);
        assert!(!table.rows()[0].pass_fail);
    }

    #[test]
    fn test_connection_selects_instruments() {
        let ethernet = LaserProfile::new(LaserConnection::Ethernet).instruments(1.0);
        assert_eq!(ethernet.len(), 2);
        assert!(ethernet.iter().all(|p| p.reads[0].modality == Modality::Ethernet));

        let daq = LaserProfile::new(LaserConnection::Daq).instruments(1.0);
        assert_eq!(daq.len(), 1);
        assert_eq!(daq[0].reads.len(), 2);
    }
}
