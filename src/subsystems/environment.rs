use super::{MetricRange, Subsystem};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const TEMPERATURE_RANGE_C: MetricRange = MetricRange::new(20.5, 22.5);
pub const PRESSURE_RANGE_KPA: MetricRange = MetricRange::new(99.5, 101.5);
pub const HUMIDITY_RANGE_PERCENT: MetricRange = MetricRange::new(40.0, 60.0);
pub const CO2_RANGE_PPM: MetricRange = MetricRange::new(350.0, 450.0);
pub const RADIATION_RANGE_USV_H: MetricRange = MetricRange::new(0.05, 0.15);
pub const SOUND_RANGE_DB: MetricRange = MetricRange::new(30.0, 45.0);

/// Cabin atmosphere and ambient conditions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalReadings {
    pub temperature: f64,
    pub pressure: f64,
    pub humidity: f64,
    pub co2_level: f64,
    pub radiation: f64,
    pub sound_level: f64,
}

impl Default for EnvironmentalReadings {
    fn default() -> Self {
        Self {
            temperature: 21.5,
            pressure: 101.3,
            humidity: 45.0,
            co2_level: 400.0,
            radiation: 0.1,
            sound_level: 37.5,
        }
    }
}

impl Subsystem for EnvironmentalReadings {
    const NAME: &'static str = "Environmental";

    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            temperature: TEMPERATURE_RANGE_C.sample(rng),
            pressure: PRESSURE_RANGE_KPA.sample(rng),
            humidity: HUMIDITY_RANGE_PERCENT.sample(rng),
            co2_level: CO2_RANGE_PPM.sample(rng),
            radiation: RADIATION_RANGE_USV_H.sample(rng),
            sound_level: SOUND_RANGE_DB.sample(rng),
        }
    }
}
