//! Percentage-valued results produced by scoring and aggregation.

use serde::{Deserialize, Serialize};

use crate::domain::error::{AttendanceError, Result};

/// Full attendance credit.
pub const FULL_CREDIT: f64 = 100.0;

/// Clamp a raw percentage into `[0, 100]`. NaN maps to zero.
pub fn clamp_percentage(raw: f64) -> f64 {
    if raw.is_nan() {
        0.0
    } else {
        raw.clamp(0.0, FULL_CREDIT)
    }
}

/// Attendance credit for one session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionScore {
    pub percentage: f64,
}

impl SessionScore {
    pub fn new(raw: f64) -> Self {
        Self {
            percentage: clamp_percentage(raw),
        }
    }
}

/// One session's contribution to an event: its duration and the credit earned.
///
/// Session identity is deliberately absent; aggregation only needs weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedSessionResult {
    pub duration_minutes: f64,
    pub percentage: f64,
}

impl WeightedSessionResult {
    pub fn new(duration_minutes: f64, percentage: f64) -> Self {
        Self {
            duration_minutes,
            percentage,
        }
    }

    /// Reject results a scorer could not have produced: a negative or
    /// non-finite duration, or a percentage outside `[0, 100]`.
    pub fn validate(&self) -> Result<()> {
        if !self.duration_minutes.is_finite() || self.duration_minutes < 0.0 {
            return Err(AttendanceError::InvalidDuration(self.duration_minutes));
        }
        if !(0.0..=FULL_CREDIT).contains(&self.percentage) {
            return Err(AttendanceError::InvalidPercentage(self.percentage));
        }
        Ok(())
    }
}

/// Where a cumulative score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    /// Aggregated from session results.
    #[default]
    Computed,
    /// Fixed by an administrative skip override.
    SkipOverride,
}

/// A user's event-level attendance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CumulativeScore {
    pub percentage: f64,
    #[serde(default)]
    pub source: ScoreSource,
}

impl CumulativeScore {
    pub fn computed(raw: f64) -> Self {
        Self {
            percentage: clamp_percentage(raw),
            source: ScoreSource::Computed,
        }
    }

    pub fn skip_override() -> Self {
        Self {
            percentage: FULL_CREDIT,
            source: ScoreSource::SkipOverride,
        }
    }

    pub fn is_overridden(&self) -> bool {
        self.source == ScoreSource::SkipOverride
    }
}
