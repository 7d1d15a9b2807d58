use super::{MetricRange, Subsystem};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const OXYGEN_RANGE: MetricRange = MetricRange::new(85.0, 98.0);
pub const WATER_RANGE: MetricRange = MetricRange::new(75.0, 95.0);
pub const FOOD_RANGE: MetricRange = MetricRange::new(80.0, 92.0);
pub const POWER_RANGE: MetricRange = MetricRange::new(82.0, 97.0);
pub const FUEL_RANGE: MetricRange = MetricRange::new(70.0, 90.0);

// Projected daily consumption in percentage points
const OXYGEN_DAILY_DRAW: f64 = 0.5;
const WATER_DAILY_DRAW: f64 = 0.7;
const FOOD_DAILY_DRAW: f64 = 0.6;

/// Consumable reserves, in percent of capacity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceLevels {
    pub oxygen: f64,
    pub water: f64,
    pub food: f64,
    pub power: f64,
    pub fuel: f64,
}

impl Default for ResourceLevels {
    fn default() -> Self {
        Self {
            oxygen: 95.0,
            water: 85.0,
            food: 90.0,
            power: 90.0,
            fuel: 80.0,
        }
    }
}

impl Subsystem for ResourceLevels {
    const NAME: &'static str = "Resources";

    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            oxygen: OXYGEN_RANGE.sample(rng),
            water: WATER_RANGE.sample(rng),
            food: FOOD_RANGE.sample(rng),
            power: POWER_RANGE.sample(rng),
            fuel: FUEL_RANGE.sample(rng),
        }
    }
}

impl ResourceLevels {
    /// Name/value pairs in display order.
    pub fn entries(&self) -> [(&'static str, f64); 5] {
        [
            ("Oxygen", self.oxygen),
            ("Water", self.water),
            ("Food", self.food),
            ("Power", self.power),
            ("Fuel", self.fuel),
        ]
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries()
            .into_iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    /// Linear projection of life-support consumables over the next `days`.
    /// Day 0 is the current level; levels never drop below zero.
    pub fn forecast(&self, days: usize) -> ResourceForecast {
        let project = |start: f64, draw: f64| -> Vec<f64> {
            (0..days).map(|day| (start - day as f64 * draw).max(0.0)).collect()
        };

        ResourceForecast {
            oxygen: project(self.oxygen, OXYGEN_DAILY_DRAW),
            water: project(self.water, WATER_DAILY_DRAW),
            food: project(self.food, FOOD_DAILY_DRAW),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceForecast {
    pub oxygen: Vec<f64>,
    pub water: Vec<f64>,
    pub food: Vec<f64>,
}
