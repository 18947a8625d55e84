//! Engine settings loaded from TOML.
//!
//! The settings file is selected via:
//! 1. an explicit path (the CLI's `--config <path>`)
//! 2. the `ATTENDANCE_CONFIG` environment variable
//! 3. built-in defaults
//!
//! ```toml
//! [logging]
//! level = "info"
//! json = false
//!
//! [aggregation]
//! weekly_constraint = true
//! minimum_minutes_per_week = 120
//! ```

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::domain::{AttendanceError, EventAggregationConfig, Result};

/// Environment variable naming the settings file.
pub const CONFIG_ENV_VAR: &str = "ATTENDANCE_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

impl LoggingSettings {
    /// Parsed verbosity; settings are validated on load, so an unparseable
    /// level only reaches here when built by hand.
    pub fn level(&self) -> Level {
        Level::from_str(&self.level).unwrap_or(Level::INFO)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    #[serde(default)]
    pub logging: LoggingSettings,
    /// Aggregation policy applied when an input does not carry its own.
    #[serde(default)]
    pub aggregation: EventAggregationConfig,
}

impl EngineSettings {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Self = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Resolve settings from an explicit path, then `ATTENDANCE_CONFIG`, then defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(env_path) if !env_path.is_empty() => Self::from_file(Path::new(&env_path)),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        Level::from_str(&self.logging.level).map_err(|_| {
            AttendanceError::InvalidConfig(format!("unknown log level '{}'", self.logging.level))
        })?;
        self.aggregation.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = EngineSettings::default();
        assert_eq!(settings.logging.level(), Level::INFO);
        assert!(!settings.logging.json);
        assert_eq!(settings.aggregation, EventAggregationConfig::unconstrained());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let settings = EngineSettings::from_toml_str("").expect("parse");
        assert_eq!(settings, EngineSettings::default());
    }

    #[test]
    fn test_unknown_level_rejected() {
        let err = EngineSettings::from_toml_str("[logging]\nlevel = \"loud\"\n").unwrap_err();
        assert!(matches!(err, AttendanceError::InvalidConfig(_)));
    }
}
