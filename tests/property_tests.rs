//! Property-based tests for the cleaning pipeline
//!
//! Core properties:
//! 1. Every retained session has exactly one event of each required type
//! 2. Every computed duration is strictly positive
//! 3. Filtering its own output changes nothing
//! 4. Every duration row lands in exactly one partition
//! 5. The outlier filter keeps exactly the rows inside f64 R-7 fences

use ally_cutover::pipeline::{
    compute_durations, filter_events, period_of, remove_outliers, split_at_cutover,
};
use ally_cutover::records::{Event, EventType, Period, Session, SessionDuration, SessionStatus};
use ally_cutover::statistics::quartiles;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use std::collections::HashMap;

fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2259, 3, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn event_type(idx: u8) -> EventType {
    match idx {
        0 => EventType::EndOfUnderwriting,
        1 => EventType::AllySubmittedResults,
        _ => EventType::Other("risk_class_decision".to_string()),
    }
}

/// Sessions S0..Sn with random statuses plus events drawn over them, sorted
/// by time as the normalizer would leave them
fn session_log() -> impl Strategy<Value = (Vec<Session>, Vec<Event>)> {
    (
        prop::collection::vec(any::<bool>(), 1..8),
        prop::collection::vec((0usize..10, 0u8..3, 0i64..50_000), 0..60),
    )
        .prop_map(|(statuses, raw_events)| {
            let sessions: Vec<Session> = statuses
                .iter()
                .enumerate()
                .map(|(i, &completed)| Session {
                    session_id: format!("S{}", i),
                    session_status: if completed {
                        SessionStatus::Completed
                    } else {
                        SessionStatus::Other("cancelled".to_string())
                    },
                    risk_class_decision_datetime: None,
                })
                .collect();

            let mut events: Vec<Event> = raw_events
                .into_iter()
                .map(|(session, kind, offset)| Event {
                    session_id: format!("S{}", session),
                    applicant_id: format!("A{}", session),
                    event_type: event_type(kind),
                    event_datetime: base() + Duration::seconds(offset),
                })
                .collect();
            events.sort_by_key(|e| e.event_datetime);

            (sessions, events)
        })
}

fn durations(values: &[f64]) -> Vec<SessionDuration> {
    values
        .iter()
        .enumerate()
        .map(|(i, &d)| SessionDuration {
            session_id: format!("S{}", i),
            applicant_id: format!("A{}", i),
            end_time: base() + Duration::hours(i as i64),
            ally_time: base()
                + Duration::hours(i as i64)
                + Duration::milliseconds((d * 1000.0) as i64),
            duration_seconds: d,
        })
        .collect()
}

/// Tukey fences from an f64 R-7 quantile: h = (n - 1)p, linear between
/// neighbours
fn reference_fences(values: &[f64], multiplier: f64) -> (f64, f64) {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let quantile = |p: f64| {
        let h = (sorted.len() - 1) as f64 * p;
        let lo = h.floor() as usize;
        let hi = h.ceil() as usize;
        sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
    };
    let (q1, q3) = (quantile(0.25), quantile(0.75));
    let iqr = q3 - q1;
    (q1 - multiplier * iqr, q3 + multiplier * iqr)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_pairing_invariant((sessions, events) in session_log()) {
        let filtered = filter_events(&sessions, &events);

        let mut per_session: HashMap<&str, Vec<&Event>> = HashMap::new();
        for event in &filtered.events {
            per_session.entry(event.session_id.as_str()).or_default().push(event);
        }

        for (session_id, kept) in &per_session {
            prop_assert_eq!(kept.len(), 2);
            prop_assert!(kept.iter().any(|e| e.event_type == EventType::EndOfUnderwriting));
            prop_assert!(kept.iter().any(|e| e.event_type == EventType::AllySubmittedResults));

            // Each kept event is the latest of its type for that session
            for kept_event in kept {
                let latest = events
                    .iter()
                    .filter(|e| {
                        e.session_id == *session_id && e.event_type == kept_event.event_type
                    })
                    .map(|e| e.event_datetime)
                    .max();
                prop_assert_eq!(Some(kept_event.event_datetime), latest);
            }
        }
        prop_assert_eq!(filtered.audit.retained_sessions, per_session.len());
    }

    #[test]
    fn prop_only_completed_sessions_retained((sessions, events) in session_log()) {
        let filtered = filter_events(&sessions, &events);
        for event in &filtered.events {
            let session = sessions.iter().find(|s| s.session_id == event.session_id);
            prop_assert!(session.is_some_and(|s| s.session_status.is_completed()));
        }
    }

    #[test]
    fn prop_durations_strictly_positive((sessions, events) in session_log()) {
        let filtered = filter_events(&sessions, &events);
        let table = compute_durations(&filtered.events);

        prop_assert!(table.rows.iter().all(|r| r.duration_seconds > 0.0));
        prop_assert!(table.rows.iter().all(|r| r.ally_time > r.end_time));
        prop_assert_eq!(
            table.rows.len() + table.audit.non_positive,
            filtered.audit.retained_sessions
        );
    }

    #[test]
    fn prop_filter_idempotent((sessions, events) in session_log()) {
        let once = filter_events(&sessions, &events);
        let twice = filter_events(&sessions, &once.events);
        prop_assert_eq!(&once.events, &twice.events);
    }

    #[test]
    fn prop_partition_complete(
        values in prop::collection::vec(0.5f64..10_000.0, 0..40),
        cutover_hours in 0i64..48,
    ) {
        let rows = durations(&values);
        let cutover = base() + Duration::hours(cutover_hours);
        let parts = split_at_cutover(&rows, cutover);

        prop_assert_eq!(parts.before.len() + parts.after.len(), rows.len());
        prop_assert!(parts.before.iter().all(|r| r.end_time < cutover));
        prop_assert!(parts.after.iter().all(|r| r.end_time >= cutover));
        for row in &rows {
            let side = period_of(row, cutover);
            prop_assert!(parts.get(side).contains(row));
        }
    }

    #[test]
    fn prop_outlier_removal_matches_reference_fences(
        values in prop::collection::vec(0.5f64..10_000.0, 1..60),
        multiplier in 0.0f64..3.0,
    ) {
        let rows = durations(&values);
        let filtered = remove_outliers(Period::Before, &rows, multiplier).unwrap();
        prop_assert_eq!(filtered.rows.len() + filtered.removed, rows.len());
        prop_assert!(filtered.rows.iter().all(|r| rows.contains(r)));

        let (lower, upper) = reference_fences(&values, multiplier);
        // Values within rounding distance of a fence may go either way
        let slack = 1e-6 * (upper - lower).max(1.0);
        for row in &rows {
            let kept = filtered.rows.contains(row);
            let d = row.duration_seconds;
            if d > lower + slack && d < upper - slack {
                prop_assert!(kept, "{} inside [{}, {}] was removed", d, lower, upper);
            }
            if d < lower - slack || d > upper + slack {
                prop_assert!(!kept, "{} outside [{}, {}] was kept", d, lower, upper);
            }
        }

        // Kept values all sit inside the fences, so their spread can't
        // exceed the fence width
        if !filtered.rows.is_empty() {
            let (q1, q3) = quartiles(&filtered.durations()).unwrap();
            prop_assert!(q3 - q1 <= upper - lower + 2.0 * slack);
        }
    }
}
