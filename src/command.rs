//! Free-text command handling for the voice assistant.
//!
//! Input is lower-cased and checked against an ordered rule list; the first
//! rule whose predicate matches runs its action. When nothing matches the
//! fallback reply is returned and the session is left untouched.

use crate::session::{Panel, Role, SessionState, Theme};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const FALLBACK_RESPONSE: &str = "I didn't understand that command.";
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NAVIGATION_VERBS: [&str; 3] = ["switch to", "open", "show"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandRule {
    StatusReport,
    SwitchPanel,
    ActivateEmergency,
    DeactivateEmergency,
    SetTheme,
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpretation {
    pub rule: CommandRule,
    pub response: String,
}

type Predicate = fn(&str) -> bool;
type Action = fn(&str, &mut SessionState, DateTime<Utc>) -> String;

struct Rule {
    kind: CommandRule,
    matches: Predicate,
    apply: Action,
}

/// Ordered keyword rules; earlier rules take precedence.
pub struct CommandInterpreter {
    rules: Vec<Rule>,
}

impl CommandInterpreter {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Rule {
                    kind: CommandRule::StatusReport,
                    matches: |text| text.contains("status") || text.contains("report"),
                    apply: status_report,
                },
                Rule {
                    kind: CommandRule::SwitchPanel,
                    matches: |text| {
                        NAVIGATION_VERBS.iter().any(|verb| text.contains(verb))
                            && mentioned_panel(text).is_some()
                    },
                    apply: switch_panel,
                },
                Rule {
                    kind: CommandRule::ActivateEmergency,
                    matches: |text| text.contains("emergency") && requests_activation(text),
                    apply: |_, session, _| {
                        session.emergency_mode = true;
                        "Emergency protocols activated.".into()
                    },
                },
                Rule {
                    kind: CommandRule::DeactivateEmergency,
                    matches: |text| {
                        text.contains("emergency")
                            && (text.contains("deactivate") || text.contains("disable"))
                    },
                    apply: |_, session, _| {
                        session.emergency_mode = false;
                        "Emergency protocols deactivated.".into()
                    },
                },
                Rule {
                    kind: CommandRule::SetTheme,
                    matches: |text| text.contains("dark mode") || text.contains("light mode"),
                    apply: set_theme,
                },
            ],
        }
    }

    /// Rule kinds in evaluation order.
    pub fn rule_order(&self) -> Vec<CommandRule> {
        self.rules.iter().map(|r| r.kind).collect()
    }

    /// Run `input` against the rules, record the exchange in the voice log
    /// and return the reply.
    pub fn interpret(&self, input: &str, session: &mut SessionState, now: DateTime<Utc>) -> Interpretation {
        let text = input.to_lowercase();
        session.log_voice(Role::User, input);

        let interpretation = match self.rules.iter().find(|rule| (rule.matches)(&text)) {
            Some(rule) => Interpretation {
                rule: rule.kind,
                response: (rule.apply)(&text, session, now),
            },
            None => Interpretation {
                rule: CommandRule::Unrecognized,
                response: FALLBACK_RESPONSE.into(),
            },
        };

        debug!("🎤 {:?} -> {:?}", input, interpretation.rule);
        session.log_voice(Role::Assistant, interpretation.response.clone());
        interpretation
    }
}

impl Default for CommandInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn mentioned_panel(text: &str) -> Option<Panel> {
    Panel::ALL.into_iter().find(|panel| text.contains(panel.keyword()))
}

// "deactivate" contains "activate"; it must not count as an activation
fn requests_activation(text: &str) -> bool {
    text.replace("deactivate", "").contains("activate") || text.contains("enable")
}

fn status_report(_: &str, session: &mut SessionState, now: DateTime<Utc>) -> String {
    format!(
        "All systems are {}. Current time is {}.",
        session.system_status.as_str().to_lowercase(),
        now.format(TIME_FORMAT)
    )
}

fn switch_panel(text: &str, session: &mut SessionState, _: DateTime<Utc>) -> String {
    match mentioned_panel(text) {
        Some(panel) => {
            session.selected_panel = panel;
            format!("Switching to {} module.", panel.keyword())
        }
        None => FALLBACK_RESPONSE.into(),
    }
}

fn set_theme(text: &str, session: &mut SessionState, _: DateTime<Utc>) -> String {
    session.theme = if text.contains("dark") { Theme::Dark } else { Theme::Light };
    format!("Switching to {} mode.", session.theme.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn session() -> SessionState {
        SessionState::new(Utc::now())
    }

    #[test]
    fn test_rule_order() {
        let interpreter = CommandInterpreter::new();
        assert_eq!(
            interpreter.rule_order(),
            vec![
                CommandRule::StatusReport,
                CommandRule::SwitchPanel,
                CommandRule::ActivateEmergency,
                CommandRule::DeactivateEmergency,
                CommandRule::SetTheme,
            ]
        );
    }

    #[test]
    fn test_status_report_format() {
        let interpreter = CommandInterpreter::new();
        let mut session = session();
        let now = Utc.with_ymd_and_hms(2025, 4, 1, 8, 30, 0).unwrap();

        let result = interpreter.interpret("Give me a status report", &mut session, now);
        assert_eq!(result.rule, CommandRule::StatusReport);
        assert_eq!(result.response, "All systems are nominal. Current time is 2025-04-01 08:30:00.");
    }

    #[test]
    fn test_status_takes_precedence_over_emergency() {
        let interpreter = CommandInterpreter::new();
        let mut session = session();
        let result = interpreter.interpret("emergency status, activate", &mut session, Utc::now());
        assert_eq!(result.rule, CommandRule::StatusReport);
        assert!(!session.emergency_mode);
    }

    #[test]
    fn test_panel_switch() {
        let interpreter = CommandInterpreter::new();
        let mut session = session();

        let result = interpreter.interpret("Open the 3D View", &mut session, Utc::now());
        assert_eq!(result.rule, CommandRule::SwitchPanel);
        assert_eq!(session.selected_panel, Panel::View3D);
        assert_eq!(result.response, "Switching to 3d view module.");
    }

    #[test]
    fn test_navigation_verb_without_panel_falls_through() {
        let interpreter = CommandInterpreter::new();
        let mut session = session();

        let result = interpreter.interpret("show me something", &mut session, Utc::now());
        assert_eq!(result.rule, CommandRule::Unrecognized);
        assert_eq!(session.selected_panel, Panel::Dashboard);
    }

    #[test]
    fn test_emergency_enable_disable_words() {
        let interpreter = CommandInterpreter::new();
        let mut session = session();

        interpreter.interpret("enable emergency", &mut session, Utc::now());
        assert!(session.emergency_mode);
        interpreter.interpret("disable emergency", &mut session, Utc::now());
        assert!(!session.emergency_mode);
    }

    #[test]
    fn test_emergency_without_verb_is_unrecognized() {
        let interpreter = CommandInterpreter::new();
        let mut session = session();
        let result = interpreter.interpret("emergency", &mut session, Utc::now());
        assert_eq!(result.rule, CommandRule::Unrecognized);
        assert_eq!(result.response, FALLBACK_RESPONSE);
    }

    #[test]
    fn test_theme_switch() {
        let interpreter = CommandInterpreter::new();
        let mut session = session();

        let result = interpreter.interpret("Light mode please", &mut session, Utc::now());
        assert_eq!(session.theme, Theme::Light);
        assert_eq!(result.response, "Switching to light mode.");

        interpreter.interpret("back to dark mode", &mut session, Utc::now());
        assert_eq!(session.theme, Theme::Dark);
    }

    #[test]
    fn test_voice_log_records_exchange() {
        let interpreter = CommandInterpreter::new();
        let mut session = session();
        interpreter.interpret("xyzzy", &mut session, Utc::now());

        assert_eq!(session.voice_log.len(), 2);
        assert_eq!(session.voice_log[0].role, Role::User);
        assert_eq!(session.voice_log[0].content, "xyzzy");
        assert_eq!(session.voice_log[1].role, Role::Assistant);
        assert_eq!(session.voice_log[1].content, FALLBACK_RESPONSE);
    }
}
