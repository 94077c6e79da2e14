//! Normalizer: typed records with parsed timestamps, events in time order

use crate::error::Result;
use crate::records::{Applicant, Event, EventType, RawTables, Session, SessionStatus};
use crate::timestamp::{parse_optional, parse_required};

/// The three tables after date normalization
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedTables {
    pub applicants: Vec<Applicant>,
    pub sessions: Vec<Session>,
    /// Sorted ascending by `event_datetime`, ties in input order
    pub events: Vec<Event>,
}

/// Parse every date field and sort events chronologically
///
/// # Errors
/// `AnalysisError::DateParse` on the first value that can't be parsed.
pub fn normalize(raw: &RawTables) -> Result<NormalizedTables> {
    let applicants = raw
        .applicants
        .iter()
        .map(|a| {
            Ok(Applicant {
                applicant_id: a.applicant_id.clone(),
                birth_date: parse_optional("birth_date", &a.birth_date)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let sessions = raw
        .sessions
        .iter()
        .map(|s| {
            Ok(Session {
                session_id: s.session_id.clone(),
                session_status: SessionStatus::parse(&s.session_status),
                risk_class_decision_datetime: parse_optional(
                    "risk_class_decision_datetime",
                    &s.risk_class_decision_datetime,
                )?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut events = raw
        .events
        .iter()
        .map(|e| {
            Ok(Event {
                session_id: e.session_id.clone(),
                applicant_id: e.applicant_id.clone(),
                event_type: EventType::parse(&e.event_type),
                event_datetime: parse_required("event_datetime", &e.event_datetime)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    events.sort_by_key(|e| e.event_datetime);

    tracing::debug!(
        applicants = applicants.len(),
        sessions = sessions.len(),
        events = events.len(),
        "Normalized input tables"
    );

    Ok(NormalizedTables {
        applicants,
        sessions,
        events,
    })
}
