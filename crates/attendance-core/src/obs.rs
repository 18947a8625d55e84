//! Structured tracing hooks for cumulative-score computation.
//!
//! Every event carries a stable `event = "..."` field so log pipelines can
//! filter on it regardless of message text.

use tracing::{debug, info, warn};

use crate::domain::{EventId, SessionId, UserId};

/// RAII guard that enters a span scoped to one user's standing in one event.
///
/// ```ignore
/// let _span = EvaluationSpan::enter(event_id, user_id);
/// // tracing calls below carry event_id and user_id
/// ```
pub struct EvaluationSpan {
    _span: tracing::span::EnteredSpan,
}

impl EvaluationSpan {
    pub fn enter(event_id: EventId, user_id: UserId) -> Self {
        let span =
            tracing::info_span!("attendance.evaluate", event_id = %event_id, user_id = %user_id);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: sessions scored for a user.
pub fn emit_sessions_scored(user_id: UserId, sessions: usize) {
    debug!(event = "session.scored", user_id = %user_id, sessions = sessions);
}

/// Emit event: cumulative score computed by full aggregation.
pub fn emit_cumulative_computed(
    user_id: UserId,
    event_id: EventId,
    percentage: f64,
    sessions: usize,
) {
    info!(
        event = "cumulative.computed",
        user_id = %user_id,
        event_id = %event_id,
        percentage = percentage,
        sessions = sessions,
    );
}

/// Emit event: cached cumulative advanced incrementally.
pub fn emit_delta_applied(previous: f64, current: f64, session_count: usize) {
    debug!(
        event = "cumulative.delta_applied",
        previous = previous,
        current = current,
        session_count = session_count,
    );
}

/// Emit event: cached cumulative discarded in favor of a full recomputation.
pub fn emit_recompute_forced(reason: &str) {
    info!(event = "cumulative.recompute_forced", reason = %reason);
}

/// Emit event: skip override fixed the cumulative score.
pub fn emit_skip_override_applied(user_id: UserId, event_id: EventId, ignored_records: usize) {
    info!(
        event = "skip_override.applied",
        user_id = %user_id,
        event_id = %event_id,
        ignored_records = ignored_records,
    );
}

/// Emit event: attendance record referenced a session not scheduled for the event.
pub fn emit_unknown_session(user_id: UserId, session_id: SessionId) {
    warn!(event = "record.unknown_session", user_id = %user_id, session_id = %session_id);
}
