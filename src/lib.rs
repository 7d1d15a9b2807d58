//! # Habitat Dashboard Core
//!
//! State management, telemetry refresh, notifications and voice command
//! handling behind a space habitat operations dashboard.
//!
//! ## Features
//!
//! - **Session state**: one explicit record of every subsystem plus UI flags
//! - **Telemetry refresh**: interval-gated regeneration from a pluggable source
//! - **Notifications**: bounded, newest-first log with severity tags
//! - **Voice commands**: ordered keyword rules with a fixed fallback reply
//! - **TCP access**: line-delimited JSON requests and state broadcasts
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::Utc;
//! use habitat::HabitatDashboard;
//!
//! let now = Utc::now();
//! let mut dashboard = HabitatDashboard::new(now);
//! dashboard.start(now);
//!
//! let reply = dashboard.interpret("show resources", now);
//! println!("{}", reply.response);
//!
//! // Nothing happens until the refresh interval has elapsed
//! assert!(!dashboard.update(now).is_refreshed());
//! ```
//!
//! ## Architecture
//!
//! - [`dashboard`] - Orchestrator and request handling
//! - [`session`] - Session state record and derived views
//! - [`subsystems`] - Per-subsystem snapshot types and samplers
//! - [`telemetry`] - Telemetry source trait and simulator
//! - [`refresh`] - Interval-gated refresh controller
//! - [`notifications`] - Notification log
//! - [`command`] - Voice command interpreter
//! - [`protocol`] - Wire request/response handling
//! - [`config`] - Server configuration

#![deny(warnings)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod command;
pub mod config;
pub mod dashboard;
pub mod notifications;
pub mod protocol;
pub mod refresh;
pub mod session;
pub mod subsystems;
pub mod telemetry;

// Re-export main public types for convenience
pub use command::{CommandInterpreter, CommandRule, Interpretation};
pub use config::DashboardConfig;
pub use dashboard::{HabitatDashboard, StateReport};
pub use notifications::{Notification, NotificationLog, Severity};
pub use protocol::{Request, RequestKind, Response, ResponseStatus};
pub use refresh::{RefreshController, RefreshOutcome};
pub use session::{Panel, SessionState, SystemStatus, Theme};
pub use telemetry::{HabitatSnapshot, SimulatedTelemetry, TelemetrySource};
