//! Cached cumulative state and the incremental refresh path.
//!
//! A [`CumulativeSnapshot`] is what a persistence layer keeps per
//! (user, event) so a new submission can be folded in with
//! [`crate::aggregate::delta`] instead of re-reading every session row. Each
//! snapshot is stamped with the digest of the config it was computed under;
//! an incremental update is only allowed while that config is unchanged.

use serde::{Deserialize, Serialize};

use crate::aggregate::{
    aggregate, delta, denominator_for, earned_minutes, total_duration, weighted_sum,
};
use crate::domain::{
    clamp_percentage, AttendanceError, EventAggregationConfig, Result, WeightedSessionResult,
};
use crate::metrics::METRICS;
use crate::obs::{emit_delta_applied, emit_recompute_forced};

/// Cumulative state for one user in one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeSnapshot {
    /// Clamped cumulative percentage.
    pub percentage: f64,
    /// Earned minutes so far.
    pub weighted_sum: f64,
    /// Sum of the durations of every folded-in session.
    pub total_duration_minutes: f64,
    pub session_count: usize,
    /// Digest of the [`EventAggregationConfig`] this state was computed under.
    pub config_digest: String,
}

/// Why a cached snapshot could not be advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecomputeReason {
    NoSnapshot,
    ConfigChanged,
    HistoryMismatch,
}

impl RecomputeReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoSnapshot => "no_snapshot",
            Self::ConfigChanged => "config_changed",
            Self::HistoryMismatch => "history_mismatch",
        }
    }
}

impl CumulativeSnapshot {
    /// Zero state for a user with no sessions.
    pub fn empty(config: &EventAggregationConfig) -> Result<Self> {
        Ok(Self {
            percentage: 0.0,
            weighted_sum: 0.0,
            total_duration_minutes: 0.0,
            session_count: 0,
            config_digest: config.digest()?,
        })
    }

    /// Full recomputation over `results`.
    pub fn from_results(
        results: &[WeightedSessionResult],
        config: &EventAggregationConfig,
    ) -> Result<Self> {
        Ok(Self {
            percentage: aggregate(results, config).percentage,
            weighted_sum: weighted_sum(results),
            total_duration_minutes: total_duration(results),
            session_count: results.len(),
            config_digest: config.digest()?,
        })
    }

    /// Whether this snapshot was computed under `config`.
    pub fn is_current(&self, config: &EventAggregationConfig) -> Result<bool> {
        Ok(self.config_digest == config.digest()?)
    }

    /// Fold one more session result in without rescanning history.
    ///
    /// Fails with [`AttendanceError::StaleSnapshot`] when `config` differs from
    /// the one this snapshot was computed under; the caller must then
    /// recompute from the full history.
    pub fn advance(
        &self,
        result: &WeightedSessionResult,
        config: &EventAggregationConfig,
    ) -> Result<Self> {
        let current = config.digest()?;
        if current != self.config_digest {
            return Err(AttendanceError::StaleSnapshot {
                cached: self.config_digest.clone(),
                current,
            });
        }

        let total_duration_minutes = self.total_duration_minutes + result.duration_minutes;
        let change = delta(
            result.percentage,
            result.duration_minutes,
            self.percentage,
            self.weighted_sum,
            denominator_for(config.mode(), total_duration_minutes),
        );

        Ok(Self {
            percentage: clamp_percentage(self.percentage + change),
            weighted_sum: self.weighted_sum
                + earned_minutes(result.duration_minutes, result.percentage),
            total_duration_minutes,
            session_count: self.session_count + 1,
            config_digest: current,
        })
    }
}

/// Produce the snapshot that includes `new_result`.
///
/// `history` holds the results already reflected in `cached` (excluding
/// `new_result`). The cached snapshot is advanced incrementally when it is
/// present, was computed under `config`, and covers exactly `history`;
/// otherwise the snapshot is rebuilt from `history` plus `new_result`.
pub fn refresh_cumulative(
    cached: Option<&CumulativeSnapshot>,
    history: &[WeightedSessionResult],
    new_result: &WeightedSessionResult,
    config: &EventAggregationConfig,
) -> Result<CumulativeSnapshot> {
    let reason = match cached {
        None => RecomputeReason::NoSnapshot,
        Some(snapshot) if !snapshot.is_current(config)? => RecomputeReason::ConfigChanged,
        Some(snapshot) if snapshot.session_count != history.len() => {
            RecomputeReason::HistoryMismatch
        }
        Some(snapshot) => {
            let next = snapshot.advance(new_result, config)?;
            METRICS.inc_deltas();
            emit_delta_applied(snapshot.percentage, next.percentage, next.session_count);
            return Ok(next);
        }
    };

    emit_recompute_forced(reason.as_str());
    METRICS.inc_recomputes_forced();

    let mut all = Vec::with_capacity(history.len() + 1);
    all.extend_from_slice(history);
    all.push(*new_result);
    CumulativeSnapshot::from_results(&all, config)
}
