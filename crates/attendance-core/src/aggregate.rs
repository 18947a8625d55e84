//! Event aggregator.
//!
//! Reduces a user's [`WeightedSessionResult`]s for an event into one
//! [`CumulativeScore`], and computes the incremental change caused by one new
//! result. Both paths share [`earned_minutes`] and [`percentage_of`] so the
//! formulas cannot drift apart.

use crate::domain::{
    AggregationMode, CumulativeScore, EventAggregationConfig, WeightedSessionResult,
};

// ---------------------------------------------------------------------------
// Shared formulas
// ---------------------------------------------------------------------------

/// Credited minutes for one session: `duration * percentage / 100`.
pub fn earned_minutes(duration_minutes: f64, percentage: f64) -> f64 {
    duration_minutes * percentage / 100.0
}

/// `weighted_sum` as a percentage of `denominator`; zero when there is no
/// denominator. Not clamped.
pub fn percentage_of(weighted_sum: f64, denominator: f64) -> f64 {
    if denominator <= 0.0 {
        return 0.0;
    }
    (weighted_sum / denominator) * 100.0
}

/// Total earned minutes across `results`.
pub fn weighted_sum(results: &[WeightedSessionResult]) -> f64 {
    results
        .iter()
        .map(|r| earned_minutes(r.duration_minutes, r.percentage))
        .sum()
}

/// Total scheduled minutes across `results`.
pub fn total_duration(results: &[WeightedSessionResult]) -> f64 {
    results.iter().map(|r| r.duration_minutes).sum()
}

/// Denominator in force for `mode` given the running total of session minutes.
pub fn denominator_for(mode: AggregationMode, total_duration_minutes: f64) -> f64 {
    match mode {
        AggregationMode::Constrained { quota_minutes } => quota_minutes,
        AggregationMode::Unconstrained => total_duration_minutes,
    }
}

// ---------------------------------------------------------------------------
// Full recomputation
// ---------------------------------------------------------------------------

/// Aggregate a complete set of session results.
///
/// An empty set scores zero. In constrained mode the earned minutes are
/// measured against the weekly quota, so attending more than the quota still
/// caps at 100. Otherwise the result is the duration-weighted average.
pub fn aggregate(
    results: &[WeightedSessionResult],
    config: &EventAggregationConfig,
) -> CumulativeScore {
    if results.is_empty() {
        return CumulativeScore::computed(0.0);
    }

    let denominator = denominator_for(config.mode(), total_duration(results));
    CumulativeScore::computed(percentage_of(weighted_sum(results), denominator))
}

// ---------------------------------------------------------------------------
// Incremental path
// ---------------------------------------------------------------------------

/// Change in cumulative percentage from adding one session result.
///
/// `total_minutes` must be the denominator for the active mode (the quota, or
/// the running duration total *including* the new session) and must match the
/// convention used to produce `previous_cumulative` and
/// `previous_weighted_sum`. The returned delta is not clamped.
pub fn delta(
    new_percentage: f64,
    new_duration_minutes: f64,
    previous_cumulative: f64,
    previous_weighted_sum: f64,
    total_minutes: f64,
) -> f64 {
    if total_minutes == 0.0 {
        return 0.0;
    }
    let new_weighted_sum =
        previous_weighted_sum + earned_minutes(new_duration_minutes, new_percentage);
    percentage_of(new_weighted_sum, total_minutes) - previous_cumulative
}
