//! Skip-override policy: the entry point for a user's cumulative score.

use crate::aggregate::aggregate;
use crate::domain::{
    CumulativeScore, EventAggregationConfig, EventId, SkipOverrides, UserId,
    WeightedSessionResult,
};
use crate::metrics::METRICS;
use crate::obs::{emit_cumulative_computed, emit_skip_override_applied};

/// Resolve a user's cumulative score for an event.
///
/// An active skip override fixes the score at 100 and the aggregator is never
/// called; `results` are then irrelevant to the outcome. Otherwise the
/// results are aggregated under `config`.
pub fn resolve_cumulative(
    user_id: UserId,
    event_id: EventId,
    overrides: &SkipOverrides,
    results: &[WeightedSessionResult],
    config: &EventAggregationConfig,
) -> CumulativeScore {
    resolve_with_ignored(user_id, event_id, overrides, results, results.len(), config)
}

/// As [`resolve_cumulative`], but reports `ignored_records` when the override
/// applies. Callers that drop a user's records before scoring pass the count
/// of records they dropped.
pub(crate) fn resolve_with_ignored(
    user_id: UserId,
    event_id: EventId,
    overrides: &SkipOverrides,
    results: &[WeightedSessionResult],
    ignored_records: usize,
    config: &EventAggregationConfig,
) -> CumulativeScore {
    if overrides.is_active(user_id, event_id) {
        METRICS.inc_skip_overrides();
        emit_skip_override_applied(user_id, event_id, ignored_records);
        return CumulativeScore::skip_override();
    }

    let score = aggregate(results, config);
    METRICS.inc_aggregations();
    emit_cumulative_computed(user_id, event_id, score.percentage, results.len());
    score
}
