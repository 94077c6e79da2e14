//! Typed records for the three input tables and the derived duration table

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Applicant row as read from the source table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawApplicant {
    pub applicant_id: String,
    pub birth_date: String,
}

/// Session row as read from the source table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSession {
    pub session_id: String,
    pub session_status: String,
    pub risk_class_decision_datetime: String,
}

/// Event row as read from the source table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub session_id: String,
    pub applicant_id: String,
    pub event_type: String,
    pub event_datetime: String,
}

/// The three source tables, untouched
#[derive(Debug, Clone, Default)]
pub struct RawTables {
    pub applicants: Vec<RawApplicant>,
    pub sessions: Vec<RawSession>,
    pub events: Vec<RawEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applicant {
    pub applicant_id: String,
    pub birth_date: Option<NaiveDateTime>,
}

/// Lifecycle status of an underwriting session
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    Completed,
    Other(String),
}

impl SessionStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "completed" => SessionStatus::Completed,
            other => SessionStatus::Other(other.to_string()),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, SessionStatus::Completed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub session_id: String,
    pub session_status: SessionStatus,
    pub risk_class_decision_datetime: Option<NaiveDateTime>,
}

/// Kind of session event
///
/// Only the two variants with a role in the duration metric survive filtering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventType {
    /// Applicant finished answering the underwriting test
    EndOfUnderwriting,
    /// Ally formally submitted the test results
    AllySubmittedResults,
    Other(String),
}

impl EventType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "end_of_underwriting" => EventType::EndOfUnderwriting,
            "ally_submitted_results" | "Ally submitted test results" => {
                EventType::AllySubmittedResults
            }
            other => EventType::Other(other.to_string()),
        }
    }

    /// True for the two event types the duration metric needs
    pub fn is_required(&self) -> bool {
        !matches!(self, EventType::Other(_))
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::EndOfUnderwriting => write!(f, "end_of_underwriting"),
            EventType::AllySubmittedResults => write!(f, "ally_submitted_results"),
            EventType::Other(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Event {
    pub session_id: String,
    pub applicant_id: String,
    pub event_type: EventType,
    pub event_datetime: NaiveDateTime,
}

/// Elapsed time between underwriting end and ally submission for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDuration {
    pub session_id: String,
    pub applicant_id: String,
    pub end_time: NaiveDateTime,
    pub ally_time: NaiveDateTime,
    /// Always > 0 once produced by the duration calculator
    pub duration_seconds: f64,
}

/// Side of the cutover a record falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Before,
    After,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Before => write!(f, "before"),
            Period::After => write!(f, "after"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_status_parse() {
        assert_eq!(SessionStatus::parse("completed"), SessionStatus::Completed);
        assert_eq!(SessionStatus::parse(" completed "), SessionStatus::Completed);
        assert_eq!(
            SessionStatus::parse("pending"),
            SessionStatus::Other("pending".to_string())
        );
        assert!(!SessionStatus::parse("Completed").is_completed());
    }

    #[test]
    fn test_event_type_accepts_both_ally_spellings() {
        assert_eq!(
            EventType::parse("ally_submitted_results"),
            EventType::AllySubmittedResults
        );
        assert_eq!(
            EventType::parse("Ally submitted test results"),
            EventType::AllySubmittedResults
        );
        assert_eq!(
            EventType::parse("end_of_underwriting"),
            EventType::EndOfUnderwriting
        );
    }

    #[test]
    fn test_event_type_required() {
        assert!(EventType::EndOfUnderwriting.is_required());
        assert!(EventType::AllySubmittedResults.is_required());
        assert!(!EventType::parse("start_of_underwriting").is_required());
    }

    #[test]
    fn test_event_type_display_is_canonical() {
        assert_eq!(
            EventType::parse("Ally submitted test results").to_string(),
            "ally_submitted_results"
        );
        assert_eq!(EventType::parse("call_scheduled").to_string(), "call_scheduled");
    }

    #[test]
    fn test_period_display() {
        assert_eq!(Period::Before.to_string(), "before");
        assert_eq!(Period::After.to_string(), "after");
    }
}
