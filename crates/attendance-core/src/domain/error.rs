//! Error taxonomy for the validation and policy surface around the engine.
//!
//! Scoring and aggregation themselves are total; these errors come from
//! constructing inputs, loading settings, and advancing cached state.

use chrono::{DateTime, Utc};

use super::ids::{EventId, UserId};

/// Attendance engine errors.
#[derive(Debug, thiserror::Error)]
pub enum AttendanceError {
    #[error("invalid session window: end {end} is before start {start}")]
    InvalidSessionWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("invalid session duration: {0} minutes")]
    InvalidDuration(f64),

    #[error("invalid percentage: {0} is outside [0, 100]")]
    InvalidPercentage(f64),

    #[error("invalid aggregation config: {0}")]
    InvalidConfig(String),

    #[error("skip override already active for user {user_id} in event {event_id}")]
    SkipAlreadyActive { user_id: UserId, event_id: EventId },

    #[error("cumulative snapshot is stale: cached config {cached}, current config {current}")]
    StaleSnapshot { cached: String, current: String },

    #[error("settings parse error: {0}")]
    Settings(#[from] toml::de::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for attendance engine operations.
pub type Result<T> = std::result::Result<T, AttendanceError>;
