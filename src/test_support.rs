// Shared fixtures for unit tests

use crate::config::AnalysisConfig;
use crate::pipeline::{run_analysis, AnalysisReport};
use crate::records::{RawEvent, RawSession, RawTables};
use chrono::{Duration, NaiveDate};

/// Completed sessions with the given durations (seconds); `day` is the day
/// of March 2259 the underwriting ends on
pub(crate) fn add_sessions(tables: &mut RawTables, prefix: &str, day: u32, durations: &[i64]) {
    for (i, &d) in durations.iter().enumerate() {
        let id = format!("{}{}", prefix, i);
        let end = NaiveDate::from_ymd_opt(2259, 3, day)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
            + Duration::minutes(i as i64 * 30);
        let ally = end + Duration::seconds(d);

        tables.sessions.push(RawSession {
            session_id: id.clone(),
            session_status: "completed".to_string(),
            risk_class_decision_datetime: String::new(),
        });
        for (kind, when) in [("end_of_underwriting", end), ("ally_submitted_results", ally)] {
            tables.events.push(RawEvent {
                session_id: id.clone(),
                applicant_id: format!("A-{}", id),
                event_type: kind.to_string(),
                event_datetime: when.format("%Y-%m-%d %H:%M:%S").to_string(),
            });
        }
    }
}

/// A run where durations dropped from ~300 s to ~200 s after 15/03/2259
pub(crate) fn sample_report() -> AnalysisReport {
    let mut tables = RawTables::default();
    add_sessions(&mut tables, "B", 3, &[290, 295, 300, 305, 310]);
    add_sessions(&mut tables, "F", 20, &[190, 195, 200, 205, 210]);
    run_analysis(&tables, &AnalysisConfig::default()).unwrap()
}
