//! Event-level aggregation configuration.

use serde::{Deserialize, Serialize};

use crate::domain::digest::compute_digest;
use crate::domain::error::{AttendanceError, Result};

/// How an event's per-session results are weighted into a cumulative score.
///
/// `minimum_minutes_per_week` only takes effect when `weekly_constraint` is
/// set and the minimum is positive; any other combination falls back to the
/// unconstrained weighted average.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EventAggregationConfig {
    #[serde(default)]
    pub weekly_constraint: bool,
    #[serde(default)]
    pub minimum_minutes_per_week: Option<f64>,
}

/// The denominator regime resolved from an [`EventAggregationConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AggregationMode {
    /// Earned minutes are divided by a fixed weekly quota.
    Constrained { quota_minutes: f64 },
    /// Earned minutes are divided by the sum of session durations.
    Unconstrained,
}

impl EventAggregationConfig {
    /// Plain weighted average over attended sessions.
    pub fn unconstrained() -> Self {
        Self::default()
    }

    /// Weighted against a fixed weekly quota of minutes.
    pub fn weekly(minimum_minutes_per_week: f64) -> Self {
        Self {
            weekly_constraint: true,
            minimum_minutes_per_week: Some(minimum_minutes_per_week),
        }
    }

    pub fn mode(&self) -> AggregationMode {
        match self.minimum_minutes_per_week {
            Some(quota) if self.weekly_constraint && quota > 0.0 => AggregationMode::Constrained {
                quota_minutes: quota,
            },
            _ => AggregationMode::Unconstrained,
        }
    }

    /// Reject minimums that cannot have come from a well-formed event record.
    ///
    /// A zero minimum is accepted; it selects the unconstrained formula.
    pub fn validate(&self) -> Result<()> {
        match self.minimum_minutes_per_week {
            Some(m) if !m.is_finite() => Err(AttendanceError::InvalidConfig(format!(
                "minimum_minutes_per_week must be finite, got {}",
                m
            ))),
            Some(m) if m < 0.0 => Err(AttendanceError::InvalidConfig(format!(
                "minimum_minutes_per_week must not be negative, got {}",
                m
            ))),
            _ => Ok(()),
        }
    }

    /// Digest identifying this exact configuration.
    ///
    /// A non-finite minimum has no canonical JSON form and is rejected.
    pub fn digest(&self) -> Result<String> {
        if let Some(m) = self.minimum_minutes_per_week.filter(|m| !m.is_finite()) {
            return Err(AttendanceError::InvalidConfig(format!(
                "minimum_minutes_per_week must be finite, got {}",
                m
            )));
        }
        compute_digest(self)
    }
}
