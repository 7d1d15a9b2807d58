use crate::notifications::{Notification, Severity};
use crate::session::SessionState;
use crate::subsystems::SubsystemId;
use crate::telemetry::TelemetrySource;
use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_NOTIFICATION_PROBABILITY: f64 = 0.3;
pub const MAX_REFRESH_INTERVAL_SECS: u64 = 86_400;

const MESSAGE_TEMPLATES: [MessageTemplate; 4] = [
    MessageTemplate::Anomaly,
    MessageTemplate::Optimized,
    MessageTemplate::MaintenanceDue,
    MessageTemplate::DiagnosticComplete,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MessageTemplate {
    Anomaly,
    Optimized,
    MaintenanceDue,
    DiagnosticComplete,
}

impl MessageTemplate {
    fn render(self, system: SubsystemId) -> String {
        match self {
            MessageTemplate::Anomaly => format!("{} systems showing slight anomaly", system),
            MessageTemplate::Optimized => format!("{} performance optimized", system),
            MessageTemplate::MaintenanceDue => format!("Scheduled maintenance for {} system due", system),
            MessageTemplate::DiagnosticComplete => format!("{} diagnostic complete", system),
        }
    }
}

/// Result of one refresh attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// Interval has not elapsed; nothing changed.
    Skipped,
    Refreshed { notification: Option<Notification> },
}

impl RefreshOutcome {
    pub fn is_refreshed(&self) -> bool {
        matches!(self, RefreshOutcome::Refreshed { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RefreshStats {
    pub total_refreshes: u64,
    pub total_skipped: u64,
    pub notifications_raised: u64,
}

/// Time-gated telemetry regeneration.
///
/// Idle until `refresh_interval` has passed since the session's
/// `last_refresh_time`; repeated calls inside one interval are no-ops.
#[derive(Debug)]
pub struct RefreshController {
    refresh_interval: Duration,
    notification_probability: f64,
    stats: RefreshStats,
}

impl RefreshController {
    pub fn new() -> Self {
        Self::with_settings(DEFAULT_REFRESH_INTERVAL_SECS, DEFAULT_NOTIFICATION_PROBABILITY)
    }

    pub fn with_settings(interval_secs: u64, notification_probability: f64) -> Self {
        debug_assert!(
            (0.0..=1.0).contains(&notification_probability),
            "Notification probability {} outside [0, 1]",
            notification_probability
        );

        Self {
            refresh_interval: Duration::seconds(interval_secs.min(MAX_REFRESH_INTERVAL_SECS) as i64),
            notification_probability,
            stats: RefreshStats::default(),
        }
    }

    pub fn is_due(&self, session: &SessionState, now: DateTime<Utc>) -> bool {
        now - session.last_refresh_time >= self.refresh_interval
    }

    /// Refresh the session if the interval has elapsed.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        session: &mut SessionState,
        source: &mut dyn TelemetrySource,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> RefreshOutcome {
        if !self.is_due(session, now) {
            self.stats.total_skipped = self.stats.total_skipped.saturating_add(1);
            return RefreshOutcome::Skipped;
        }

        self.force_refresh(session, source, rng, now)
    }

    /// Refresh regardless of the interval.
    pub fn force_refresh<R: Rng + ?Sized>(
        &mut self,
        session: &mut SessionState,
        source: &mut dyn TelemetrySource,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> RefreshOutcome {
        session.apply_snapshot(source.produce_snapshot());

        let notification = if rng.gen::<f64>() < self.notification_probability {
            let (message, severity) = synthesize_notification(rng);
            info!("🔔 {} [{}]", message, severity);
            self.stats.notifications_raised = self.stats.notifications_raised.saturating_add(1);
            Some(session.notifications.add_at(message, severity, now).clone())
        } else {
            None
        };

        session.last_refresh_time = now;
        self.stats.total_refreshes = self.stats.total_refreshes.saturating_add(1);
        debug!("Telemetry refreshed from {} source", source.name());

        RefreshOutcome::Refreshed { notification }
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    pub fn get_stats(&self) -> &RefreshStats {
        &self.stats
    }
}

impl Default for RefreshController {
    fn default() -> Self {
        Self::new()
    }
}

fn synthesize_notification<R: Rng + ?Sized>(rng: &mut R) -> (String, Severity) {
    let system = *SubsystemId::ALL.choose(rng).unwrap_or(&SubsystemId::Environmental);
    let template = *MESSAGE_TEMPLATES.choose(rng).unwrap_or(&MessageTemplate::DiagnosticComplete);
    let severity = *Severity::ALL.choose(rng).unwrap_or(&Severity::Info);
    (template.render(system), severity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::SimulatedTelemetry;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixture() -> (SessionState, SimulatedTelemetry, StdRng, DateTime<Utc>) {
        let start = Utc::now();
        (
            SessionState::new(start),
            SimulatedTelemetry::seeded(1),
            StdRng::seed_from_u64(2),
            start,
        )
    }

    #[test]
    fn test_not_due_before_interval() {
        let (mut session, mut source, mut rng, start) = fixture();
        let mut controller = RefreshController::new();

        let outcome = controller.tick(&mut session, &mut source, &mut rng, start + Duration::seconds(29));
        assert_eq!(outcome, RefreshOutcome::Skipped);
        assert_eq!(session.last_refresh_time, start);
        assert_eq!(controller.get_stats().total_skipped, 1);
    }

    #[test]
    fn test_refresh_at_interval_boundary() {
        let (mut session, mut source, mut rng, start) = fixture();
        let mut controller = RefreshController::new();
        let now = start + Duration::seconds(30);

        let outcome = controller.tick(&mut session, &mut source, &mut rng, now);
        assert!(outcome.is_refreshed());
        assert_eq!(session.last_refresh_time, now);
        assert_eq!(session.crew.len(), 8);
        assert!(session.notifications.len() <= 1);
    }

    #[test]
    fn test_clock_going_backwards_skips() {
        let (mut session, mut source, mut rng, start) = fixture();
        let mut controller = RefreshController::new();
        let outcome = controller.tick(&mut session, &mut source, &mut rng, start - Duration::seconds(60));
        assert_eq!(outcome, RefreshOutcome::Skipped);
    }

    #[test]
    fn test_probability_bounds() {
        let (mut session, mut source, mut rng, start) = fixture();

        let mut never = RefreshController::with_settings(30, 0.0);
        for i in 1..=20 {
            never.tick(&mut session, &mut source, &mut rng, start + Duration::seconds(30 * i));
        }
        assert!(session.notifications.is_empty());

        let mut always = RefreshController::with_settings(30, 1.0);
        let outcome = always.force_refresh(&mut session, &mut source, &mut rng, start);
        match outcome {
            RefreshOutcome::Refreshed { notification: Some(n) } => {
                assert_eq!(n.time, start);
                assert!(!n.read);
                assert_eq!(session.notifications.latest(), Some(&n));
            }
            other => panic!("expected a notification, got {:?}", other),
        }
        assert_eq!(always.get_stats().notifications_raised, 1);
    }

    #[test]
    fn test_synthesized_messages_use_known_templates() {
        let mut rng = StdRng::seed_from_u64(77);
        for _ in 0..100 {
            let (message, _) = synthesize_notification(&mut rng);
            let known_system = SubsystemId::ALL.iter().any(|s| message.contains(s.name()));
            assert!(known_system, "unexpected message {}", message);
            let known_template = message.ends_with("showing slight anomaly")
                || message.ends_with("performance optimized")
                || message.starts_with("Scheduled maintenance for")
                || message.ends_with("diagnostic complete");
            assert!(known_template, "unexpected message {}", message);
        }
    }
}
