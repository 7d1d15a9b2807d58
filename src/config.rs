use crate::refresh::{DEFAULT_NOTIFICATION_PROBABILITY, DEFAULT_REFRESH_INTERVAL_SECS, MAX_REFRESH_INTERVAL_SECS};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BROADCAST_BUFFER: usize = 64;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Runtime settings for the dashboard server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub refresh_interval_secs: u64,
    pub notification_probability: f64,
    pub bind_address: String,
    pub port: u16,
    pub broadcast_buffer: usize,
    /// Fixed seed for the telemetry simulator; entropy when unset.
    pub seed: Option<u64>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            notification_probability: DEFAULT_NOTIFICATION_PROBABILITY,
            bind_address: DEFAULT_BIND_ADDRESS.into(),
            port: DEFAULT_PORT,
            broadcast_buffer: DEFAULT_BROADCAST_BUFFER,
            seed: None,
        }
    }
}

impl DashboardConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval_secs == 0 || self.refresh_interval_secs > MAX_REFRESH_INTERVAL_SECS {
            return Err(ConfigError::Invalid(format!(
                "refresh_interval_secs must be between 1 and {}, got {}",
                MAX_REFRESH_INTERVAL_SECS, self.refresh_interval_secs
            )));
        }
        if !(0.0..=1.0).contains(&self.notification_probability) {
            return Err(ConfigError::Invalid(format!(
                "notification_probability must be within [0, 1], got {}",
                self.notification_probability
            )));
        }
        if self.broadcast_buffer == 0 {
            return Err(ConfigError::Invalid("broadcast_buffer must be non-zero".into()));
        }
        Ok(())
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.refresh_interval_secs, 30);
        assert!((config.notification_probability - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.listen_address(), "127.0.0.1:8080");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = DashboardConfig::from_json_str(r#"{"refresh_interval_secs": 5, "seed": 9}"#).unwrap();
        assert_eq!(config.refresh_interval_secs, 5);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            DashboardConfig::from_json_str(r#"{"refresh_interval_secs": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            DashboardConfig::from_json_str(r#"{"notification_probability": 1.5}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            DashboardConfig::from_json_str("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = DashboardConfig::from_json_file("/nonexistent/habitat.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
