//! Event-wide evaluation: score every attendance record, aggregate per user,
//! and apply skip overrides.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    ArrivalEvent, CumulativeScore, EventAggregationConfig, EventId, SessionId, SessionWindow,
    SkipOverrides, UserId, WeightedSessionResult,
};
use crate::metrics::METRICS;
use crate::obs::{emit_sessions_scored, emit_unknown_session, EvaluationSpan};
use crate::policy::{resolve_cumulative, resolve_with_ignored};
use crate::scoring::score;

/// A session scheduled for the event under evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledSession {
    pub session_id: SessionId,
    pub window: SessionWindow,
}

/// One arrival submission as stored by the surrounding system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub user_id: UserId,
    pub session_id: SessionId,
    pub arrival_time: DateTime<Utc>,
    /// When the submission was made; the latest one per (user, session) counts.
    pub submitted_at: DateTime<Utc>,
}

/// Scored outcome of one attended session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub session_id: SessionId,
    pub arrival_time: DateTime<Utc>,
    pub duration_minutes: f64,
    pub percentage: f64,
}

impl SessionOutcome {
    pub fn weighted(&self) -> WeightedSessionResult {
        WeightedSessionResult::new(self.duration_minutes, self.percentage)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStanding {
    pub user_id: UserId,
    pub cumulative: CumulativeScore,
    /// Scored sessions; empty when a skip override bypassed scoring.
    pub sessions: Vec<SessionOutcome>,
    /// Records that did not contribute: unknown sessions, or every record
    /// when the user holds a skip override.
    pub ignored_records: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventReport {
    pub event_id: EventId,
    pub config: EventAggregationConfig,
    /// One entry per user, ordered by user id.
    pub users: Vec<UserStanding>,
}

impl EventReport {
    pub fn standing(&self, user_id: UserId) -> Option<&UserStanding> {
        self.users.iter().find(|u| u.user_id == user_id)
    }
}

/// Collapse submissions to the latest one per (user, session).
///
/// Later `submitted_at` wins; on a tie the record appearing later in
/// `records` wins. Output is ordered by (user, session).
pub fn latest_records(records: &[AttendanceRecord]) -> Vec<AttendanceRecord> {
    let mut latest: BTreeMap<(UserId, SessionId), AttendanceRecord> = BTreeMap::new();
    for record in records {
        let key = (record.user_id, record.session_id);
        match latest.get(&key) {
            Some(existing) if existing.submitted_at > record.submitted_at => {}
            _ => {
                latest.insert(key, *record);
            }
        }
    }
    latest.into_values().collect()
}

/// Evaluate every user's standing in one event.
///
/// Users appear when they have at least one record or hold an active skip
/// override for `event_id`. Records for sessions not listed in `sessions` are
/// ignored with a warning.
pub fn evaluate_event(
    event_id: EventId,
    sessions: &[ScheduledSession],
    records: &[AttendanceRecord],
    config: &EventAggregationConfig,
    overrides: &SkipOverrides,
) -> EventReport {
    let windows: HashMap<SessionId, &SessionWindow> =
        sessions.iter().map(|s| (s.session_id, &s.window)).collect();

    let mut by_user: BTreeMap<UserId, Vec<AttendanceRecord>> = BTreeMap::new();
    for user_id in overrides.users_for(event_id) {
        by_user.entry(user_id).or_default();
    }
    for record in latest_records(records) {
        by_user.entry(record.user_id).or_default().push(record);
    }

    let users = by_user
        .into_iter()
        .map(|(user_id, user_records)| {
            let _span = EvaluationSpan::enter(event_id, user_id);

            if overrides.is_active(user_id, event_id) {
                // Session rows stay on record but play no part in the score.
                let ignored_records = user_records.len();
                return UserStanding {
                    user_id,
                    cumulative: resolve_with_ignored(
                        user_id,
                        event_id,
                        overrides,
                        &[],
                        ignored_records,
                        config,
                    ),
                    sessions: Vec::new(),
                    ignored_records,
                };
            }

            let mut outcomes = Vec::with_capacity(user_records.len());
            let mut ignored_records = 0;
            for record in &user_records {
                let Some(window) = windows.get(&record.session_id) else {
                    emit_unknown_session(user_id, record.session_id);
                    ignored_records += 1;
                    continue;
                };
                outcomes.push(SessionOutcome {
                    session_id: record.session_id,
                    arrival_time: record.arrival_time,
                    duration_minutes: window.duration_minutes,
                    percentage: score(window, &ArrivalEvent::at(record.arrival_time)).percentage,
                });
            }
            METRICS.add_sessions_scored(outcomes.len() as u64);
            emit_sessions_scored(user_id, outcomes.len());

            let results: Vec<WeightedSessionResult> =
                outcomes.iter().map(SessionOutcome::weighted).collect();
            UserStanding {
                user_id,
                cumulative: resolve_cumulative(user_id, event_id, overrides, &results, config),
                sessions: outcomes,
                ignored_records,
            }
        })
        .collect();

    EventReport {
        event_id,
        config: *config,
        users,
    }
}
