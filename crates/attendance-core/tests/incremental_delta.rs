//! Incremental path: summed deltas and advanced snapshots must agree with a
//! full recomputation.

use attendance_core::{
    aggregate, delta, earned_minutes, refresh_cumulative, AttendanceError, CumulativeSnapshot,
    EventAggregationConfig, WeightedSessionResult,
};

const TOLERANCE: f64 = 1e-9;

fn history() -> Vec<WeightedSessionResult> {
    vec![
        WeightedSessionResult::new(60.0, 100.0),
        WeightedSessionResult::new(45.0, 62.5),
        WeightedSessionResult::new(90.0, 0.0),
        WeightedSessionResult::new(30.0, 87.0),
        WeightedSessionResult::new(0.0, 100.0),
    ]
}

// ---- raw delta ----

#[test]
fn summed_deltas_match_aggregate_unconstrained() {
    let results = history();
    let mut cumulative = 0.0;
    let mut weighted = 0.0;
    let mut total = 0.0;

    for r in &results {
        total += r.duration_minutes;
        cumulative += delta(r.percentage, r.duration_minutes, cumulative, weighted, total);
        weighted += earned_minutes(r.duration_minutes, r.percentage);
    }

    let full = aggregate(&results, &EventAggregationConfig::unconstrained()).percentage;
    assert!((cumulative - full).abs() < TOLERANCE, "{} vs {}", cumulative, full);
}

#[test]
fn summed_deltas_match_aggregate_constrained() {
    let results = history();
    let quota = 400.0;
    let mut cumulative = 0.0;
    let mut weighted = 0.0;

    for r in &results {
        cumulative += delta(r.percentage, r.duration_minutes, cumulative, weighted, quota);
        weighted += earned_minutes(r.duration_minutes, r.percentage);
    }

    let full = aggregate(&results, &EventAggregationConfig::weekly(quota)).percentage;
    assert!((cumulative - full).abs() < TOLERANCE, "{} vs {}", cumulative, full);
}

#[test]
fn zero_denominator_yields_no_change() {
    assert_eq!(delta(100.0, 0.0, 0.0, 0.0, 0.0), 0.0);
}

// ---- snapshots ----

#[test]
fn advancing_snapshot_matches_full_recompute() {
    for config in [
        EventAggregationConfig::unconstrained(),
        EventAggregationConfig::weekly(150.0),
    ] {
        let results = history();
        let mut snapshot = CumulativeSnapshot::empty(&config).expect("empty");
        for r in &results {
            snapshot = snapshot.advance(r, &config).expect("advance");
        }
        let full = CumulativeSnapshot::from_results(&results, &config).expect("full");

        assert!((snapshot.percentage - full.percentage).abs() < TOLERANCE);
        assert!((snapshot.weighted_sum - full.weighted_sum).abs() < TOLERANCE);
        assert_eq!(snapshot.session_count, full.session_count);
        assert_eq!(snapshot.config_digest, full.config_digest);
    }
}

#[test]
fn advancing_past_quota_stays_capped() {
    let config = EventAggregationConfig::weekly(60.0);
    let mut snapshot = CumulativeSnapshot::empty(&config).expect("empty");
    for _ in 0..3 {
        snapshot = snapshot
            .advance(&WeightedSessionResult::new(60.0, 100.0), &config)
            .expect("advance");
        assert_eq!(snapshot.percentage, 100.0);
    }
    // a missed session after the cap still reflects true earned minutes
    let after = snapshot
        .advance(&WeightedSessionResult::new(60.0, 0.0), &config)
        .expect("advance");
    assert_eq!(after.percentage, 100.0);
    assert_eq!(after.weighted_sum, 180.0);
}

#[test]
fn config_change_makes_snapshot_stale() {
    let before = EventAggregationConfig::weekly(120.0);
    let after = EventAggregationConfig::weekly(180.0);
    let snapshot = CumulativeSnapshot::from_results(&history(), &before).expect("snapshot");

    assert!(snapshot.is_current(&before).expect("digest"));
    assert!(!snapshot.is_current(&after).expect("digest"));

    let err = snapshot
        .advance(&WeightedSessionResult::new(30.0, 100.0), &after)
        .unwrap_err();
    assert!(matches!(err, AttendanceError::StaleSnapshot { .. }));
}

// ---- refresh ----

#[test]
fn refresh_uses_cached_snapshot_when_current() {
    let config = EventAggregationConfig::unconstrained();
    let prior = history();
    let cached = CumulativeSnapshot::from_results(&prior, &config).expect("cached");
    let new_result = WeightedSessionResult::new(60.0, 50.0);

    let refreshed =
        refresh_cumulative(Some(&cached), &prior, &new_result, &config).expect("refresh");

    let mut all = prior.clone();
    all.push(new_result);
    let expected = aggregate(&all, &config).percentage;
    assert!((refreshed.percentage - expected).abs() < TOLERANCE);
    assert_eq!(refreshed.session_count, all.len());
}

#[test]
fn refresh_recomputes_after_config_change() {
    let prior = history();
    let cached = CumulativeSnapshot::from_results(&prior, &EventAggregationConfig::weekly(120.0))
        .expect("cached");
    let edited = EventAggregationConfig::weekly(300.0);
    let new_result = WeightedSessionResult::new(60.0, 100.0);

    let refreshed =
        refresh_cumulative(Some(&cached), &prior, &new_result, &edited).expect("refresh");

    let mut all = prior.clone();
    all.push(new_result);
    let expected = CumulativeSnapshot::from_results(&all, &edited).expect("expected");
    assert_eq!(refreshed, expected);
}

#[test]
fn refresh_recomputes_when_history_does_not_match_snapshot() {
    let config = EventAggregationConfig::unconstrained();
    let prior = history();
    // snapshot covers only the first two sessions
    let cached = CumulativeSnapshot::from_results(&prior[..2], &config).expect("cached");
    let new_result = WeightedSessionResult::new(15.0, 100.0);

    let refreshed =
        refresh_cumulative(Some(&cached), &prior, &new_result, &config).expect("refresh");

    let mut all = prior.clone();
    all.push(new_result);
    assert_eq!(refreshed.session_count, all.len());
    assert!((refreshed.percentage - aggregate(&all, &config).percentage).abs() < TOLERANCE);
}

#[test]
fn refresh_without_snapshot_builds_one() {
    let config = EventAggregationConfig::weekly(120.0);
    let refreshed = refresh_cumulative(None, &[], &WeightedSessionResult::new(60.0, 100.0), &config)
        .expect("refresh");
    assert_eq!(refreshed.percentage, 50.0);
    assert_eq!(refreshed.session_count, 1);
}
