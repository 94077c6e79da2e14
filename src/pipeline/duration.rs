//! Duration calculator: one row per session, ally submission minus
//! underwriting end

use crate::records::{Event, EventType, SessionDuration};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What happened to the joined sessions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationAudit {
    /// Sessions with both an end and an ally event
    pub paired_sessions: usize,
    /// Rows dropped because the ally event didn't come after the end event
    pub non_positive: usize,
}

/// Output of the duration stage
#[derive(Debug, Clone, PartialEq)]
pub struct DurationTable {
    /// Ordered by the position of the underwriting-end event
    pub rows: Vec<SessionDuration>,
    pub audit: DurationAudit,
}

fn seconds_between(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    let delta: Duration = end - start;
    match delta.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => delta.num_seconds() as f64,
    }
}

/// Join end and ally events by session and compute `duration_seconds`
///
/// Expects filtered input (one event of each type per session). If a type
/// repeats anyway, the last one in input order is used.
pub fn compute_durations(events: &[Event]) -> DurationTable {
    let ally_times: HashMap<&str, NaiveDateTime> = events
        .iter()
        .filter(|e| e.event_type == EventType::AllySubmittedResults)
        .map(|e| (e.session_id.as_str(), e.event_datetime))
        .collect();

    let mut latest_end: HashMap<&str, &Event> = HashMap::new();
    let mut end_order: Vec<&str> = Vec::new();
    for event in events
        .iter()
        .filter(|e| e.event_type == EventType::EndOfUnderwriting)
    {
        if latest_end.insert(event.session_id.as_str(), event).is_none() {
            end_order.push(event.session_id.as_str());
        }
    }

    let mut audit = DurationAudit::default();
    let mut rows = Vec::with_capacity(end_order.len());
    for session_id in end_order {
        let (Some(end), Some(&ally_time)) = (latest_end.get(session_id), ally_times.get(session_id))
        else {
            continue;
        };
        audit.paired_sessions += 1;

        let duration_seconds = seconds_between(end.event_datetime, ally_time);
        if duration_seconds <= 0.0 {
            audit.non_positive += 1;
            tracing::debug!(
                session_id,
                duration_seconds,
                "Dropping session with non-positive duration"
            );
            continue;
        }

        rows.push(SessionDuration {
            session_id: session_id.to_string(),
            applicant_id: end.applicant_id.clone(),
            end_time: end.event_datetime,
            ally_time,
            duration_seconds,
        });
    }

    if audit.non_positive > 0 {
        tracing::warn!(
            dropped = audit.non_positive,
            paired = audit.paired_sessions,
            "Ally submission recorded at or before underwriting end"
        );
    }
    tracing::debug!(rows = rows.len(), "Computed session durations");

    DurationTable { rows, audit }
}
