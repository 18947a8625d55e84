//! Session windows and arrivals: the inputs to session scoring.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::{AttendanceError, Result};

const MILLIS_PER_MINUTE: f64 = 60_000.0;

/// Minutes elapsed from `from` to `to`; negative when `to` is earlier.
pub(crate) fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_MINUTE
}

/// The scheduled start/end of one session.
///
/// # Invariants
///
/// `end >= start` and `duration_minutes >= 0`. `duration_minutes` is
/// authoritative for scoring: it may be pre-computed by the caller rather than
/// derived from the instants. The constructors enforce both invariants; values
/// built directly from the public fields are trusted as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: f64,
}

impl SessionWindow {
    /// Build a window whose duration is derived from `end - start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end < start {
            return Err(AttendanceError::InvalidSessionWindow { start, end });
        }
        Ok(Self {
            start,
            end,
            duration_minutes: minutes_between(start, end),
        })
    }

    /// Build a window with a pre-computed duration.
    pub fn with_duration(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        duration_minutes: f64,
    ) -> Result<Self> {
        let window = Self {
            start,
            end,
            duration_minutes,
        };
        window.validate()?;
        Ok(window)
    }

    /// Check the window invariants on a value that bypassed the constructors,
    /// such as one deserialized from caller input.
    pub fn validate(&self) -> Result<()> {
        if self.end < self.start {
            return Err(AttendanceError::InvalidSessionWindow {
                start: self.start,
                end: self.end,
            });
        }
        if !self.duration_minutes.is_finite() || self.duration_minutes < 0.0 {
            return Err(AttendanceError::InvalidDuration(self.duration_minutes));
        }
        Ok(())
    }

    /// Minutes between the session start and the arrival, floored at zero.
    pub fn late_minutes(&self, arrival: &ArrivalEvent) -> f64 {
        minutes_between(self.start, arrival.arrival_time).max(0.0)
    }
}

/// The moment a user reported arriving at a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrivalEvent {
    pub arrival_time: DateTime<Utc>,
}

impl ArrivalEvent {
    pub fn at(arrival_time: DateTime<Utc>) -> Self {
        Self { arrival_time }
    }
}
