use attendance_core::{
    evaluate_event, resolve_cumulative, AttendanceError, AttendanceRecord, EventAggregationConfig,
    EventId, ScheduledSession, ScoreSource, SessionId, SessionWindow, SkipOverride, SkipOverrides,
    UserId, WeightedSessionResult,
};
use chrono::{Duration, TimeZone, Utc};

fn poor_results() -> Vec<WeightedSessionResult> {
    vec![
        WeightedSessionResult::new(60.0, 0.0),
        WeightedSessionResult::new(60.0, 10.0),
    ]
}

#[test]
fn active_override_fixes_score_at_full_credit() {
    let user = UserId::new();
    let event = EventId::new();
    let overrides: SkipOverrides = [SkipOverride::granted(user, event)].iter().collect();

    for config in [
        EventAggregationConfig::unconstrained(),
        EventAggregationConfig::weekly(600.0),
    ] {
        for results in [Vec::new(), poor_results()] {
            let score = resolve_cumulative(user, event, &overrides, &results, &config);
            assert_eq!(score.percentage, 100.0);
            assert_eq!(score.source, ScoreSource::SkipOverride);
        }
    }
}

#[test]
fn cleared_override_restores_computed_score() {
    let user = UserId::new();
    let event = EventId::new();
    let mut skip = SkipOverride::granted(user, event);
    skip.clear();
    let overrides: SkipOverrides = [skip].iter().collect();

    let score = resolve_cumulative(
        user,
        event,
        &overrides,
        &poor_results(),
        &EventAggregationConfig::unconstrained(),
    );
    assert_eq!(score.percentage, 5.0);
    assert_eq!(score.source, ScoreSource::Computed);
}

#[test]
fn override_for_other_user_does_not_apply() {
    let event = EventId::new();
    let overrides: SkipOverrides = [SkipOverride::granted(UserId::new(), event)]
        .iter()
        .collect();
    let score = resolve_cumulative(
        UserId::new(),
        event,
        &overrides,
        &poor_results(),
        &EventAggregationConfig::unconstrained(),
    );
    assert!(!score.is_overridden());
}

#[test]
fn double_activation_is_a_conflict() {
    let mut skip = SkipOverride::inactive(UserId::new(), EventId::new());
    skip.activate().expect("activate");
    match skip.activate() {
        Err(AttendanceError::SkipAlreadyActive { user_id, event_id }) => {
            assert_eq!(user_id, skip.user_id);
            assert_eq!(event_id, skip.event_id);
        }
        other => panic!("expected conflict, got {:?}", other),
    }
}

#[test]
fn evaluation_bypasses_scoring_for_overridden_user() {
    let event = EventId::new();
    let session = SessionId::new();
    let start = Utc.with_ymd_and_hms(2025, 2, 3, 18, 0, 0).unwrap();
    let sessions = [ScheduledSession {
        session_id: session,
        window: SessionWindow::new(start, start + Duration::minutes(60)).unwrap(),
    }];

    let skipped = UserId::new();
    let granted_without_records = UserId::new();
    let records = [AttendanceRecord {
        user_id: skipped,
        session_id: session,
        arrival_time: start + Duration::minutes(55),
        submitted_at: start + Duration::minutes(55),
    }];
    let overrides: SkipOverrides = [
        SkipOverride::granted(skipped, event),
        SkipOverride::granted(granted_without_records, event),
    ]
    .iter()
    .collect();

    let report = evaluate_event(
        event,
        &sessions,
        &records,
        &EventAggregationConfig::unconstrained(),
        &overrides,
    );

    let standing = report.standing(skipped).expect("skipped user present");
    assert_eq!(standing.cumulative.percentage, 100.0);
    assert!(standing.sessions.is_empty());
    assert_eq!(standing.ignored_records, 1);

    let standing = report
        .standing(granted_without_records)
        .expect("granted user present even without records");
    assert_eq!(standing.cumulative.percentage, 100.0);
    assert_eq!(standing.ignored_records, 0);
}
