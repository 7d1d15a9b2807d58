use crate::command::{CommandInterpreter, Interpretation};
use crate::config::{ConfigError, DashboardConfig};
use crate::notifications::Severity;
use crate::protocol::{
    ProtocolError, ProtocolHandler, Request, RequestKind, Response, ResponsePayload, ResponseStatus,
};
use crate::refresh::{RefreshController, RefreshOutcome, RefreshStats};
use crate::session::{Panel, SessionState, Theme};
use crate::telemetry::{SimulatedTelemetry, TelemetrySource};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

pub const EMERGENCY_ACTIVATED_MESSAGE: &str = "EMERGENCY PROTOCOLS ACTIVATED";
pub const EMERGENCY_DEACTIVATED_MESSAGE: &str = "Emergency protocols deactivated";

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Figures derived from the session for summary cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub crew_on_duty: usize,
    pub crew_total: usize,
    pub average_crew_health: Option<f64>,
    pub unread_notifications: usize,
    pub open_maintenance_tasks: usize,
    pub refresh_stats: RefreshStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateReport {
    pub session: SessionState,
    pub overview: Overview,
}

/// Owns the session and every component that reads or mutates it.
pub struct HabitatDashboard {
    session: SessionState,
    refresh: RefreshController,
    source: Box<dyn TelemetrySource>,
    interpreter: CommandInterpreter,
    protocol: ProtocolHandler,
    rng: StdRng,
    running: bool,
}

impl HabitatDashboard {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with_source(Box::new(SimulatedTelemetry::from_entropy()), RefreshController::new(), StdRng::from_entropy(), now)
    }

    pub fn from_config(config: &DashboardConfig, now: DateTime<Utc>) -> Result<Self, DashboardError> {
        config.validate()?;

        let refresh = RefreshController::with_settings(config.refresh_interval_secs, config.notification_probability);
        let dashboard = match config.seed {
            Some(seed) => Self::with_source(
                Box::new(SimulatedTelemetry::seeded(seed)),
                refresh,
                StdRng::seed_from_u64(seed.wrapping_add(1)),
                now,
            ),
            None => Self::with_source(
                Box::new(SimulatedTelemetry::from_entropy()),
                refresh,
                StdRng::from_entropy(),
                now,
            ),
        };
        Ok(dashboard)
    }

    pub fn with_source(
        source: Box<dyn TelemetrySource>,
        refresh: RefreshController,
        rng: StdRng,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            session: SessionState::new(now),
            refresh,
            source,
            interpreter: CommandInterpreter::new(),
            protocol: ProtocolHandler::new(),
            rng,
            running: false,
        }
    }

    /// Populate the first snapshot immediately rather than after one interval.
    pub fn start(&mut self, now: DateTime<Utc>) -> RefreshOutcome {
        self.running = true;
        info!("🚀 Habitat dashboard starting with {} telemetry", self.source.name());
        info!("   Refresh interval: {}s", self.refresh.refresh_interval().num_seconds());
        self.refresh.force_refresh(&mut self.session, self.source.as_mut(), &mut self.rng, now)
    }

    pub fn stop(&mut self) {
        self.running = false;
        info!("🛑 Habitat dashboard stopping");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Periodic trigger entry point; a no-op inside the refresh interval.
    pub fn update(&mut self, now: DateTime<Utc>) -> RefreshOutcome {
        if !self.running {
            return RefreshOutcome::Skipped;
        }
        self.refresh.tick(&mut self.session, self.source.as_mut(), &mut self.rng, now)
    }

    pub fn force_refresh(&mut self, now: DateTime<Utc>) -> RefreshOutcome {
        self.refresh.force_refresh(&mut self.session, self.source.as_mut(), &mut self.rng, now)
    }

    pub fn interpret(&mut self, text: &str, now: DateTime<Utc>) -> Interpretation {
        let interpretation = self.interpreter.interpret(text, &mut self.session, now);
        info!("🎤 {:?} matched {:?}", text, interpretation.rule);
        interpretation
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.session.theme = self.session.theme.toggled();
        self.session.theme
    }

    /// Flip emergency mode and raise the matching notification.
    pub fn toggle_emergency(&mut self, now: DateTime<Utc>) -> bool {
        self.session.emergency_mode = !self.session.emergency_mode;
        if self.session.emergency_mode {
            warn!("🚨 {}", EMERGENCY_ACTIVATED_MESSAGE);
            self.session.notifications.add_at(EMERGENCY_ACTIVATED_MESSAGE, Severity::Critical, now);
        } else {
            info!("{}", EMERGENCY_DEACTIVATED_MESSAGE);
            self.session.notifications.add_at(EMERGENCY_DEACTIVATED_MESSAGE, Severity::Info, now);
        }
        self.session.emergency_mode
    }

    pub fn select_panel(&mut self, panel: Panel) {
        self.session.selected_panel = panel;
    }

    pub fn set_voice_assistant(&mut self, active: bool) {
        self.session.voice_assistant_active = active;
    }

    pub fn set_gesture_control(&mut self, enabled: bool) {
        self.session.gesture_enabled = enabled;
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionState {
        &mut self.session
    }

    pub fn refresh_stats(&self) -> &RefreshStats {
        self.refresh.get_stats()
    }

    pub fn overview(&self) -> Overview {
        Overview {
            crew_on_duty: self.session.crew_on_duty(),
            crew_total: self.session.crew.len(),
            average_crew_health: self.session.average_crew_health(),
            unread_notifications: self.session.notifications.unread_count(),
            open_maintenance_tasks: self.session.maintenance_tasks.open_tasks().count(),
            refresh_stats: *self.refresh.get_stats(),
        }
    }

    pub fn state_report(&self) -> StateReport {
        StateReport {
            session: self.session.clone(),
            overview: self.overview(),
        }
    }

    /// Serialized state broadcast sent to subscribers after a refresh.
    pub fn broadcast_line(&self, now: DateTime<Utc>) -> Result<String, DashboardError> {
        let response = self.protocol.create_broadcast(self.state_report(), now);
        Ok(self.protocol.serialize_response(&response)?)
    }

    /// Parse, execute and serialize one line from a client.
    ///
    /// Every line gets a reply; a response that cannot be serialized is
    /// replaced by an `Error` response carrying the same id.
    pub fn handle_line(&mut self, line: &str, now: DateTime<Utc>) -> Result<String, DashboardError> {
        let response = match self.protocol.parse_request(line) {
            Ok(request) => self.handle_request(request, now),
            Err(e) => {
                warn!("Failed to parse request: {}", e);
                self.protocol.create_error_response(0, &e, now)
            }
        };

        match self.protocol.serialize_response(&response) {
            Ok(json) => Ok(json),
            Err(e) => {
                warn!("Failed to serialize response {}: {}", response.id, e);
                let fallback = self.protocol.create_response(
                    response.id,
                    ResponseStatus::Error,
                    Some(&e.to_string()),
                    None,
                    now,
                );
                Ok(self.protocol.serialize_response(&fallback)?)
            }
        }
    }

    pub fn handle_request(&mut self, request: Request, now: DateTime<Utc>) -> Response {
        if let Err(e) = self.protocol.validate_request(&request) {
            return self.protocol.create_error_response(request.id, &e, now);
        }

        let id = request.id;
        let (status, message, payload) = match request.kind {
            RequestKind::Ping => (ResponseStatus::Success, Some("pong".to_string()), None),

            RequestKind::GetState => (
                ResponseStatus::Success,
                None,
                Some(ResponsePayload::State(Box::new(self.state_report()))),
            ),

            RequestKind::GetNotifications { limit } => {
                let notifications = self.session.notifications.list(limit).into_iter().cloned().collect();
                (ResponseStatus::Success, None, Some(ResponsePayload::Notifications(notifications)))
            }

            RequestKind::NotificationSummary { shown } => (
                ResponseStatus::Success,
                None,
                Some(ResponsePayload::Summary(self.session.notifications.summary(shown))),
            ),

            RequestKind::GetVoiceLog { limit } => (
                ResponseStatus::Success,
                None,
                Some(ResponsePayload::VoiceLog(self.session.recent_voice_log(limit).to_vec())),
            ),

            RequestKind::Interpret { text } => {
                let interpretation = self.interpret(&text, now);
                (
                    ResponseStatus::Success,
                    Some(interpretation.response.clone()),
                    Some(ResponsePayload::Interpretation(interpretation)),
                )
            }

            RequestKind::SelectPanel { panel } => match Panel::from_name(&panel) {
                Some(panel) => {
                    self.select_panel(panel);
                    (ResponseStatus::Success, Some(format!("Selected {}", panel)), None)
                }
                None => (ResponseStatus::NotFound, Some(format!("Unknown panel: {}", panel)), None),
            },

            RequestKind::ToggleTheme => {
                let theme = self.toggle_theme();
                (ResponseStatus::Success, Some(format!("Theme set to {}", theme.as_str())), None)
            }

            RequestKind::ToggleEmergency => {
                let active = self.toggle_emergency(now);
                let message = if active { "Emergency mode active" } else { "Emergency mode cleared" };
                (ResponseStatus::Success, Some(message.to_string()), None)
            }

            RequestKind::MarkNotificationRead { id: notification_id } => {
                if self.session.notifications.mark_read(notification_id) {
                    (ResponseStatus::Success, None, None)
                } else {
                    (ResponseStatus::NotFound, Some(format!("No notification {}", notification_id)), None)
                }
            }

            RequestKind::MarkAllRead => {
                let marked = self.session.notifications.mark_all_read();
                (ResponseStatus::Success, Some(format!("Marked {} notifications read", marked)), None)
            }

            RequestKind::ForceRefresh => {
                let outcome = self.force_refresh(now);
                let message = match outcome {
                    RefreshOutcome::Refreshed { notification: Some(n) } => format!("Refreshed; {}", n.message),
                    _ => "Refreshed".to_string(),
                };
                (
                    ResponseStatus::Success,
                    Some(message),
                    Some(ResponsePayload::State(Box::new(self.state_report()))),
                )
            }
        };

        self.protocol.create_response(id, status, message.as_deref(), payload, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn dashboard(now: DateTime<Utc>) -> HabitatDashboard {
        let config = DashboardConfig {
            seed: Some(4),
            ..DashboardConfig::default()
        };
        HabitatDashboard::from_config(&config, now).unwrap()
    }

    #[test]
    fn test_start_populates_snapshot() {
        let now = Utc::now();
        let mut dashboard = dashboard(now);
        assert!(dashboard.session().crew.is_empty());

        assert!(dashboard.start(now).is_refreshed());
        assert!(dashboard.is_running());
        assert_eq!(dashboard.session().crew.len(), 8);
        assert_eq!(dashboard.session().last_refresh_time, now);
    }

    #[test]
    fn test_update_ignored_when_stopped() {
        let now = Utc::now();
        let mut dashboard = dashboard(now);
        assert_eq!(dashboard.update(now + Duration::seconds(60)), RefreshOutcome::Skipped);
    }

    #[test]
    fn test_toggle_emergency_raises_notifications() {
        let now = Utc::now();
        let mut dashboard = dashboard(now);

        assert!(dashboard.toggle_emergency(now));
        let latest = dashboard.session().notifications.latest().unwrap().clone();
        assert_eq!(latest.message, EMERGENCY_ACTIVATED_MESSAGE);
        assert_eq!(latest.severity, Severity::Critical);

        assert!(!dashboard.toggle_emergency(now));
        let latest = dashboard.session().notifications.latest().unwrap();
        assert_eq!(latest.message, EMERGENCY_DEACTIVATED_MESSAGE);
        assert_eq!(latest.severity, Severity::Info);
    }

    #[test]
    fn test_overview_after_start() {
        let now = Utc::now();
        let mut dashboard = dashboard(now);
        dashboard.start(now);

        let overview = dashboard.overview();
        assert_eq!(overview.crew_on_duty, 6);
        assert_eq!(overview.crew_total, 8);
        assert_eq!(overview.open_maintenance_tasks, 4);
        assert_eq!(overview.refresh_stats.total_refreshes, 1);
        assert!(overview.average_crew_health.is_some());
    }

    #[test]
    fn test_handle_line_round_trip() {
        let now = Utc::now();
        let mut dashboard = dashboard(now);

        let reply = dashboard
            .handle_line(r#"{"id":5,"kind":{"SelectPanel":{"panel":"Crew"}}}"#, now)
            .unwrap();
        let response: Response = serde_json::from_str(&reply).unwrap();
        assert_eq!(response.id, 5);
        assert!(response.is_success());
        assert_eq!(dashboard.session().selected_panel, Panel::Crew);

        let reply = dashboard.handle_line("garbage", now).unwrap();
        let response: Response = serde_json::from_str(&reply).unwrap();
        assert_eq!(response.status, ResponseStatus::InvalidRequest);
    }
}
