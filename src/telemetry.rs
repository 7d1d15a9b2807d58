use crate::subsystems::{
    CrewRoster, EnvironmentalReadings, MaintenanceSchedule, PowerSystems, Predictions,
    ResourceLevels, Subsystem,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// One capture of every subsystem, taken at a single instant.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HabitatSnapshot {
    pub resources: ResourceLevels,
    pub crew: CrewRoster,
    pub maintenance_tasks: MaintenanceSchedule,
    pub environment: EnvironmentalReadings,
    pub power: PowerSystems,
    pub predictions: Predictions,
}

impl HabitatSnapshot {
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            resources: ResourceLevels::sample(rng),
            crew: CrewRoster::sample(rng),
            maintenance_tasks: MaintenanceSchedule::sample(rng),
            environment: EnvironmentalReadings::sample(rng),
            power: PowerSystems::sample(rng),
            predictions: Predictions::sample(rng),
        }
    }
}

/// Anything able to report the current state of the habitat.
///
/// The refresh path only talks to this trait, so a live sensor feed can
/// replace the simulator without touching callers.
pub trait TelemetrySource: Send {
    fn produce_snapshot(&mut self) -> HabitatSnapshot;

    fn name(&self) -> &'static str {
        "unnamed"
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TelemetryMetrics {
    pub snapshots_generated: u64,
}

/// Randomized telemetry: every metric drawn uniformly from its fixed range,
/// independent of any previous snapshot.
#[derive(Debug)]
pub struct SimulatedTelemetry<R: Rng = StdRng> {
    rng: R,
    metrics: TelemetryMetrics,
}

impl SimulatedTelemetry<StdRng> {
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic stream for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SimulatedTelemetry<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            metrics: TelemetryMetrics::default(),
        }
    }

    pub fn get_metrics(&self) -> TelemetryMetrics {
        self.metrics
    }
}

impl<R: Rng + Send> TelemetrySource for SimulatedTelemetry<R> {
    fn produce_snapshot(&mut self) -> HabitatSnapshot {
        self.metrics.snapshots_generated = self.metrics.snapshots_generated.saturating_add(1);
        HabitatSnapshot::sample(&mut self.rng)
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subsystems::resources::{FOOD_RANGE, FUEL_RANGE, OXYGEN_RANGE, POWER_RANGE, WATER_RANGE};

    #[test]
    fn test_seeded_sources_are_reproducible() {
        let mut a = SimulatedTelemetry::seeded(99);
        let mut b = SimulatedTelemetry::seeded(99);
        assert_eq!(a.produce_snapshot(), b.produce_snapshot());
        assert_eq!(a.produce_snapshot(), b.produce_snapshot());
    }

    #[test]
    fn test_snapshot_resources_in_range() {
        let mut source = SimulatedTelemetry::seeded(5);
        for _ in 0..200 {
            let snapshot = source.produce_snapshot();
            let r = snapshot.resources;
            assert!(OXYGEN_RANGE.contains(r.oxygen));
            assert!(WATER_RANGE.contains(r.water));
            assert!(FOOD_RANGE.contains(r.food));
            assert!(POWER_RANGE.contains(r.power));
            assert!(FUEL_RANGE.contains(r.fuel));
            assert_eq!(snapshot.crew, CrewRoster::standard());
        }
        assert_eq!(source.get_metrics().snapshots_generated, 200);
        assert_eq!(source.name(), "simulated");
    }

    #[test]
    fn test_successive_snapshots_independent() {
        let mut source = SimulatedTelemetry::seeded(8);
        let first = source.produce_snapshot();
        let second = source.produce_snapshot();
        assert_ne!(first.resources, second.resources);
    }
}
