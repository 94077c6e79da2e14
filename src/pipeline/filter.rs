//! Session/event filter
//!
//! Reduces the event table to exactly one `EndOfUnderwriting` and one
//! `AllySubmittedResults` row per completed session. When a session repeats
//! an event type, the latest occurrence wins: earlier terminations may have
//! been partial or erroneous.

use crate::records::{Event, EventType, Session};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Rows removed at each filtering step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterAudit {
    /// Sessions whose status isn't `completed`
    pub sessions_not_completed: usize,
    /// Events belonging to sessions that aren't completed (or unknown)
    pub events_outside_completed: usize,
    /// Exact duplicate event rows
    pub duplicate_events: usize,
    /// Events of a type the duration metric doesn't use
    pub irrelevant_events: usize,
    /// Sessions that had only one of the two required event types
    pub unpaired_sessions: usize,
    /// Events dropped along with those sessions
    pub unpaired_events: usize,
    /// Earlier repeats of the same (session, event type)
    pub superseded_events: usize,
    /// Sessions left with a complete pair
    pub retained_sessions: usize,
}

/// Output of the filter stage
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredEvents {
    /// Chronological, one row per (session, required event type)
    pub events: Vec<Event>,
    pub audit: FilterAudit,
}

/// Apply the cleaning policy to the event table
///
/// Events are expected in chronological order (as the normalizer leaves
/// them); the output keeps that order.
pub fn filter_events(sessions: &[Session], events: &[Event]) -> FilteredEvents {
    let mut audit = FilterAudit::default();

    // Step 1: completed sessions only
    let completed: HashSet<&str> = sessions
        .iter()
        .filter(|s| s.session_status.is_completed())
        .map(|s| s.session_id.as_str())
        .collect();
    audit.sessions_not_completed = sessions
        .iter()
        .filter(|s| !s.session_status.is_completed())
        .count();

    // Step 2: events of completed sessions
    let in_completed: Vec<&Event> = events
        .iter()
        .filter(|e| completed.contains(e.session_id.as_str()))
        .collect();
    audit.events_outside_completed = events.len() - in_completed.len();

    // Step 3: exact duplicates, first occurrence kept
    let mut seen = HashSet::new();
    let unique: Vec<&Event> = in_completed
        .iter()
        .copied()
        .filter(|e| seen.insert(*e))
        .collect();
    audit.duplicate_events = in_completed.len() - unique.len();

    // Step 4: the two event types the metric needs
    let relevant: Vec<&Event> = unique
        .iter()
        .copied()
        .filter(|e| e.event_type.is_required())
        .collect();
    audit.irrelevant_events = unique.len() - relevant.len();

    // Step 5: sessions with both types present
    let mut types_per_session: HashMap<&str, HashSet<&EventType>> = HashMap::new();
    for event in &relevant {
        types_per_session
            .entry(event.session_id.as_str())
            .or_default()
            .insert(&event.event_type);
    }
    let paired: Vec<&Event> = relevant
        .iter()
        .copied()
        .filter(|e| types_per_session[e.session_id.as_str()].len() == 2)
        .collect();
    audit.unpaired_sessions = types_per_session.values().filter(|t| t.len() != 2).count();
    audit.unpaired_events = relevant.len() - paired.len();

    // Step 6: last occurrence per (session, type), by time then position
    let mut latest: HashMap<(&str, &EventType), usize> = HashMap::new();
    for (idx, event) in paired.iter().enumerate() {
        let key = (event.session_id.as_str(), &event.event_type);
        match latest.get(&key) {
            Some(&prev) if paired[prev].event_datetime > event.event_datetime => {}
            _ => {
                latest.insert(key, idx);
            }
        }
    }
    let keep: HashSet<usize> = latest.values().copied().collect();
    let events: Vec<Event> = paired
        .iter()
        .enumerate()
        .filter(|(idx, _)| keep.contains(idx))
        .map(|(_, e)| (*e).clone())
        .collect();
    audit.superseded_events = paired.len() - events.len();
    audit.retained_sessions = events.len() / 2;

    tracing::info!(
        retained_sessions = audit.retained_sessions,
        not_completed = audit.sessions_not_completed,
        duplicates = audit.duplicate_events,
        unpaired_sessions = audit.unpaired_sessions,
        superseded = audit.superseded_events,
        "Filtered session events"
    );

    FilteredEvents { events, audit }
}
