use super::{MetricRange, Subsystem};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const SOLAR_ARRAY_RANGE: MetricRange = MetricRange::new(85.0, 99.0);
pub const MAIN_BATTERY_RANGE: MetricRange = MetricRange::new(70.0, 95.0);
pub const BACKUP_GENERATOR_RANGE: MetricRange = MetricRange::new(98.0, 100.0);
pub const CONSUMPTION_RANGE: MetricRange = MetricRange::new(60.0, 85.0);
pub const EFFICIENCY_RANGE: MetricRange = MetricRange::new(88.0, 97.0);

/// Power generation, storage and load, all in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerSystems {
    pub solar_array: f64,
    pub main_battery: f64,
    pub backup_generators: f64,
    pub power_consumption: f64,
    pub efficiency: f64,
}

impl Default for PowerSystems {
    fn default() -> Self {
        Self {
            solar_array: 90.0,
            main_battery: 80.0,
            backup_generators: 99.0,
            power_consumption: 70.0,
            efficiency: 92.0,
        }
    }
}

impl Subsystem for PowerSystems {
    const NAME: &'static str = "Power";

    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let state = Self {
            solar_array: SOLAR_ARRAY_RANGE.sample(rng),
            main_battery: MAIN_BATTERY_RANGE.sample(rng),
            backup_generators: BACKUP_GENERATOR_RANGE.sample(rng),
            power_consumption: CONSUMPTION_RANGE.sample(rng),
            efficiency: EFFICIENCY_RANGE.sample(rng),
        };

        debug_assert!(
            state.main_battery <= 100.0,
            "Battery level {} exceeds 100%",
            state.main_battery
        );

        state
    }
}
