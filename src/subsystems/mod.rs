pub mod resources;
pub mod crew;
pub mod maintenance;
pub mod environment;
pub mod power;
pub mod predictions;

pub use resources::ResourceLevels;
pub use crew::{CrewMember, CrewRoster, DutyStatus};
pub use maintenance::{MaintenanceSchedule, MaintenanceTask, TaskPriority, TaskStatus};
pub use environment::EnvironmentalReadings;
pub use power::PowerSystems;
pub use predictions::{Predictions, SolarStorm, CosmicRadiationEvent, AsteroidThreat};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Habitat systems that notifications can be raised against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubsystemId {
    Environmental,
    Power,
    LifeSupport,
    Navigation,
    Communications,
}

impl SubsystemId {
    pub const ALL: [SubsystemId; 5] = [
        SubsystemId::Environmental,
        SubsystemId::Power,
        SubsystemId::LifeSupport,
        SubsystemId::Navigation,
        SubsystemId::Communications,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SubsystemId::Environmental => "Environmental",
            SubsystemId::Power => "Power",
            SubsystemId::LifeSupport => "Life Support",
            SubsystemId::Navigation => "Navigation",
            SubsystemId::Communications => "Communications",
        }
    }
}

impl core::fmt::Display for SubsystemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Closed interval a sampled metric is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricRange {
    pub min: f64,
    pub max: f64,
}

impl MetricRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        debug_assert!(self.min <= self.max, "Range min {} above max {}", self.min, self.max);
        rng.gen_range(self.min..=self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// A snapshot of one habitat subsystem.
///
/// `Default` is the value presented before the first refresh, so a consumer
/// never observes a missing metric. `sample` produces a fresh snapshot that
/// wholesale replaces the previous one.
pub trait Subsystem: Default + Clone + Serialize {
    const NAME: &'static str;

    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self;
}
