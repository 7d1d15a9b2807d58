use crate::notifications::NotificationLog;
use crate::subsystems::{
    CrewMember, CrewRoster, DutyStatus, EnvironmentalReadings, MaintenanceSchedule, PowerSystems,
    Predictions, ResourceLevels,
};
use crate::subsystems::resources::ResourceForecast;
use crate::telemetry::HabitatSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum SystemStatus {
    #[default]
    Nominal,
    Warning,
    Critical,
}

impl SystemStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SystemStatus::Nominal => "Nominal",
            SystemStatus::Warning => "Warning",
            SystemStatus::Critical => "Critical",
        }
    }
}

impl core::fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Navigable dashboard panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Panel {
    #[default]
    Dashboard,
    #[serde(rename = "3D View")]
    View3D,
    Crew,
    Resources,
    Environmental,
    Power,
    Maintenance,
    Quantum,
}

impl Panel {
    /// Order in which panel keywords are matched against spoken commands.
    pub const ALL: [Panel; 8] = [
        Panel::Dashboard,
        Panel::Crew,
        Panel::Resources,
        Panel::Maintenance,
        Panel::Environmental,
        Panel::Power,
        Panel::View3D,
        Panel::Quantum,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Panel::Dashboard => "Dashboard",
            Panel::View3D => "3D View",
            Panel::Crew => "Crew",
            Panel::Resources => "Resources",
            Panel::Environmental => "Environmental",
            Panel::Power => "Power",
            Panel::Maintenance => "Maintenance",
            Panel::Quantum => "Quantum",
        }
    }

    /// Lowercase keyword recognised in free text.
    pub fn keyword(self) -> &'static str {
        match self {
            Panel::Dashboard => "dashboard",
            Panel::View3D => "3d view",
            Panel::Crew => "crew",
            Panel::Resources => "resources",
            Panel::Environmental => "environmental",
            Panel::Power => "power",
            Panel::Maintenance => "maintenance",
            Panel::Quantum => "quantum",
        }
    }

    pub fn from_name(name: &str) -> Option<Panel> {
        let name = name.trim();
        Panel::ALL.into_iter().find(|p| {
            p.display_name().eq_ignore_ascii_case(name) || p.keyword().eq_ignore_ascii_case(name)
        })
    }
}

impl core::fmt::Display for Panel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceLogEntry {
    pub role: Role,
    pub content: String,
}

/// Everything the dashboard shows, owned by one `HabitatDashboard`.
///
/// Subsystem fields start at their defaults and are replaced wholesale on
/// every refresh; the notification log is the only incrementally updated
/// part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub theme: Theme,
    pub system_status: SystemStatus,
    pub emergency_mode: bool,
    pub selected_panel: Panel,
    pub voice_assistant_active: bool,
    pub gesture_enabled: bool,
    pub last_refresh_time: DateTime<Utc>,
    pub resources: ResourceLevels,
    pub crew: CrewRoster,
    pub maintenance_tasks: MaintenanceSchedule,
    pub environment: EnvironmentalReadings,
    pub power: PowerSystems,
    pub predictions: Predictions,
    pub notifications: NotificationLog,
    /// Unbounded; kept out of state reports and served through
    /// [`SessionState::recent_voice_log`] instead.
    #[serde(skip)]
    pub voice_log: Vec<VoiceLogEntry>,
}

impl SessionState {
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            theme: Theme::Dark,
            system_status: SystemStatus::Nominal,
            emergency_mode: false,
            selected_panel: Panel::Dashboard,
            voice_assistant_active: false,
            gesture_enabled: true,
            last_refresh_time: created_at,
            resources: ResourceLevels::default(),
            crew: CrewRoster::default(),
            maintenance_tasks: MaintenanceSchedule::default(),
            environment: EnvironmentalReadings::default(),
            power: PowerSystems::default(),
            predictions: Predictions::default(),
            notifications: NotificationLog::new(),
            voice_log: Vec::new(),
        }
    }

    /// Overwrite every subsystem with the snapshot's values, unchanged.
    pub fn apply_snapshot(&mut self, snapshot: HabitatSnapshot) {
        self.resources = snapshot.resources;
        self.crew = snapshot.crew;
        self.maintenance_tasks = snapshot.maintenance_tasks;
        self.environment = snapshot.environment;
        self.power = snapshot.power;
        self.predictions = snapshot.predictions;
    }

    pub fn snapshot(&self) -> HabitatSnapshot {
        HabitatSnapshot {
            resources: self.resources,
            crew: self.crew.clone(),
            maintenance_tasks: self.maintenance_tasks.clone(),
            environment: self.environment,
            power: self.power,
            predictions: self.predictions.clone(),
        }
    }

    pub fn crew_on_duty(&self) -> usize {
        self.crew.on_duty()
    }

    pub fn average_crew_health(&self) -> Option<f64> {
        self.crew.average_health()
    }

    pub fn crew_by_status(&self, status: Option<DutyStatus>) -> Vec<&CrewMember> {
        self.crew.filter(status)
    }

    pub fn resource_forecast(&self, days: usize) -> ResourceForecast {
        self.resources.forecast(days)
    }

    /// The last `limit` exchanges, oldest first.
    pub fn recent_voice_log(&self, limit: usize) -> &[VoiceLogEntry] {
        let start = self.voice_log.len().saturating_sub(limit);
        &self.voice_log[start..]
    }

    pub fn log_voice(&mut self, role: Role, content: impl Into<String>) {
        self.voice_log.push(VoiceLogEntry {
            role,
            content: content.into(),
        });
    }
}
