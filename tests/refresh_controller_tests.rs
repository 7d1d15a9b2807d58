use chrono::{Duration, Utc};
use habitat::refresh::{RefreshController, RefreshOutcome};
use habitat::subsystems::ResourceLevels;
use habitat::telemetry::{HabitatSnapshot, SimulatedTelemetry, TelemetrySource};
use habitat::SessionState;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Source that always reports the same snapshot.
struct FixedTelemetry {
    snapshot: HabitatSnapshot,
    calls: u32,
}

impl FixedTelemetry {
    fn with_oxygen(oxygen: f64) -> Self {
        let mut rng = StdRng::seed_from_u64(11);
        let mut snapshot = HabitatSnapshot::sample(&mut rng);
        snapshot.resources = ResourceLevels { oxygen, ..snapshot.resources };
        Self { snapshot, calls: 0 }
    }
}

impl TelemetrySource for FixedTelemetry {
    fn produce_snapshot(&mut self) -> HabitatSnapshot {
        self.calls += 1;
        self.snapshot.clone()
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

#[test]
fn test_calls_within_interval_are_noops() {
    let start = Utc::now();
    let mut session = SessionState::new(start);
    let mut source = FixedTelemetry::with_oxygen(91.0);
    let mut rng = StdRng::seed_from_u64(1);
    let mut controller = RefreshController::with_settings(30, 1.0);

    let first = controller.tick(&mut session, &mut source, &mut rng, start + Duration::seconds(5));
    let second = controller.tick(&mut session, &mut source, &mut rng, start + Duration::seconds(29));

    assert_eq!(first, RefreshOutcome::Skipped);
    assert_eq!(second, RefreshOutcome::Skipped);
    assert_eq!(session.last_refresh_time, start);
    assert_eq!(source.calls, 0);
    assert!(session.notifications.is_empty());
    assert_eq!(controller.get_stats().total_skipped, 2);
}

#[test]
fn test_refresh_replaces_snapshot_after_interval() {
    let start = Utc::now();
    let mut session = SessionState::new(start);
    let mut source = FixedTelemetry::with_oxygen(86.5);
    let mut rng = StdRng::seed_from_u64(2);
    let mut controller = RefreshController::with_settings(30, 0.0);

    let now = start + Duration::seconds(30);
    let outcome = controller.tick(&mut session, &mut source, &mut rng, now);

    assert_eq!(outcome, RefreshOutcome::Refreshed { notification: None });
    assert_eq!(session.last_refresh_time, now);
    assert_eq!(session.resources.oxygen, 86.5);
    assert_eq!(session.snapshot(), source.snapshot);
    assert!(session.notifications.is_empty());
}

#[test]
fn test_at_most_one_notification_per_refresh() {
    let start = Utc::now();
    let mut session = SessionState::new(start);
    let mut source = SimulatedTelemetry::seeded(3);
    let mut rng = StdRng::seed_from_u64(4);
    let mut controller = RefreshController::with_settings(10, 1.0);

    for step in 1..=5 {
        let before = session.notifications.len();
        let now = start + Duration::seconds(10 * step);
        match controller.tick(&mut session, &mut source, &mut rng, now) {
            RefreshOutcome::Refreshed { notification: Some(n) } => {
                assert_eq!(session.notifications.len(), before + 1);
                assert_eq!(session.notifications.latest(), Some(&n));
                assert_eq!(n.time, now);
                assert!(!n.read);
            }
            other => panic!("expected a refresh with notification, got {:?}", other),
        }
    }

    assert_eq!(controller.get_stats().total_refreshes, 5);
    assert_eq!(controller.get_stats().notifications_raised, 5);
}

#[test]
fn test_synthesized_messages_name_a_subsystem() {
    let start = Utc::now();
    let mut session = SessionState::new(start);
    let mut source = SimulatedTelemetry::seeded(5);
    let mut rng = StdRng::seed_from_u64(6);
    let mut controller = RefreshController::with_settings(30, 1.0);

    let systems = ["Environmental", "Power", "Life Support", "Navigation", "Communications"];
    for _ in 0..20 {
        controller.force_refresh(&mut session, &mut source, &mut rng, start);
    }

    for notification in session.notifications.iter() {
        assert!(
            systems.iter().any(|s| notification.message.contains(s)),
            "unexpected message: {}",
            notification.message
        );
    }
}

#[test]
fn test_force_refresh_ignores_interval() {
    let start = Utc::now();
    let mut session = SessionState::new(start);
    let mut source = SimulatedTelemetry::seeded(7);
    let mut rng = StdRng::seed_from_u64(8);
    let mut controller = RefreshController::new();

    assert!(controller.force_refresh(&mut session, &mut source, &mut rng, start).is_refreshed());
    assert!(controller.force_refresh(&mut session, &mut source, &mut rng, start).is_refreshed());
    assert_eq!(source.get_metrics().snapshots_generated, 2);
    assert_eq!(session.crew.len(), 8);
}
