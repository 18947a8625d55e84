//! Session scorer.
//!
//! Maps one arrival against one [`SessionWindow`] to a [`SessionScore`] with a
//! straight-line lateness penalty: full credit at or before the start, zero
//! credit at or after the end.

use crate::domain::{ArrivalEvent, SessionScore, SessionWindow, WeightedSessionResult};

/// Score a single arrival.
///
/// Total over any pair of instants and any non-negative duration. A
/// zero-length session always scores zero.
pub fn score(window: &SessionWindow, arrival: &ArrivalEvent) -> SessionScore {
    let duration = window.duration_minutes;
    let late = window.late_minutes(arrival);

    if duration <= 0.0 || late >= duration {
        return SessionScore::new(0.0);
    }

    SessionScore::new(100.0 - (late / duration) * 100.0)
}

/// Score an arrival and pair it with the session's duration for aggregation.
pub fn score_weighted(window: &SessionWindow, arrival: &ArrivalEvent) -> WeightedSessionResult {
    WeightedSessionResult::new(window.duration_minutes, score(window, arrival).percentage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 2, 9, 0, 0).unwrap()
    }

    fn hour_window() -> SessionWindow {
        SessionWindow::new(start(), start() + Duration::minutes(60)).unwrap()
    }

    #[test]
    fn test_on_time_full_credit() {
        let s = score(&hour_window(), &ArrivalEvent::at(start()));
        assert_eq!(s.percentage, 100.0);
    }

    #[test]
    fn test_quarter_late() {
        let s = score(
            &hour_window(),
            &ArrivalEvent::at(start() + Duration::minutes(15)),
        );
        assert_eq!(s.percentage, 75.0);
    }

    #[test]
    fn test_arrival_at_end_scores_zero() {
        let s = score(
            &hour_window(),
            &ArrivalEvent::at(start() + Duration::minutes(60)),
        );
        assert_eq!(s.percentage, 0.0);
    }

    #[test]
    fn test_precomputed_duration_is_authoritative() {
        // 30 credited minutes inside a 60 minute slot
        let window = SessionWindow::with_duration(start(), start() + Duration::minutes(60), 30.0)
            .unwrap();
        let s = score(&window, &ArrivalEvent::at(start() + Duration::minutes(15)));
        assert_eq!(s.percentage, 50.0);
    }

    #[test]
    fn test_score_weighted_carries_duration() {
        let result = score_weighted(
            &hour_window(),
            &ArrivalEvent::at(start() + Duration::minutes(30)),
        );
        assert_eq!(result.duration_minutes, 60.0);
        assert_eq!(result.percentage, 50.0);
    }
}
