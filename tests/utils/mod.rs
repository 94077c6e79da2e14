// Integration test utilities
//
// Builders for the three input tables and a temp directory holding them as
// CSV files.

#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const APPLICANTS_HEADER: &str = "applicant_id,birth_date";
pub const SESSIONS_HEADER: &str = "session_id,session_status,risk_class_decision_datetime";
pub const EVENTS_HEADER: &str = "session_id,applicant_id,event_type,event_datetime";

/// Rows of the three tables, as CSV lines without headers
#[derive(Debug, Default, Clone)]
pub struct Dataset {
    pub applicants: Vec<String>,
    pub sessions: Vec<String>,
    pub events: Vec<String>,
}

pub fn march(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2259, 3, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// A completed session whose ally submission comes `seconds` after the
    /// underwriting end
    pub fn completed(&mut self, id: &str, end: NaiveDateTime, seconds: i64) -> &mut Self {
        self.session(id, "completed");
        self.event(id, "end_of_underwriting", end);
        self.event(id, "ally_submitted_results", end + Duration::seconds(seconds));
        self
    }

    pub fn session(&mut self, id: &str, status: &str) -> &mut Self {
        self.applicants.push(format!("A-{},01-01-2220", id));
        self.sessions.push(format!("{},{},", id, status));
        self
    }

    pub fn event(&mut self, id: &str, kind: &str, at: NaiveDateTime) -> &mut Self {
        self.events.push(format!(
            "{},A-{},{},{}",
            id,
            id,
            kind,
            at.format("%Y-%m-%d %H:%M:%S")
        ));
        self
    }

    /// One completed session per duration; "before" sessions end on 1 March,
    /// "after" sessions on 20 March 2259
    pub fn with_partitions(before: &[i64], after: &[i64]) -> Self {
        let mut data = Self::new();
        for (i, &d) in before.iter().enumerate() {
            data.completed(&format!("B{}", i), march(1, 0) + Duration::hours(i as i64), d);
        }
        for (i, &d) in after.iter().enumerate() {
            data.completed(&format!("F{}", i), march(20, 0) + Duration::hours(i as i64), d);
        }
        data
    }

    /// Write the three CSV files into a fresh temp directory
    pub fn write(&self) -> Fixture {
        let dir = TempDir::new().unwrap();
        let write = |name: &str, header: &str, rows: &[String]| {
            let path = dir.path().join(name);
            let mut content = String::from(header);
            content.push('\n');
            for row in rows {
                content.push_str(row);
                content.push('\n');
            }
            fs::write(&path, content).unwrap();
            path
        };

        let applicants = write("applicants.csv", APPLICANTS_HEADER, &self.applicants);
        let sessions = write("sessions.csv", SESSIONS_HEADER, &self.sessions);
        let events = write("events.csv", EVENTS_HEADER, &self.events);

        Fixture {
            dir,
            applicants,
            sessions,
            events,
        }
    }
}

/// CSV files on disk; removed when dropped
pub struct Fixture {
    pub dir: TempDir,
    pub applicants: PathBuf,
    pub sessions: PathBuf,
    pub events: PathBuf,
}

impl Fixture {
    /// `--applicants A --sessions S --events E`
    pub fn args(&self) -> Vec<String> {
        vec![
            "--applicants".to_string(),
            self.applicants.display().to_string(),
            "--sessions".to_string(),
            self.sessions.display().to_string(),
            "--events".to_string(),
            self.events.display().to_string(),
        ]
    }
}

/// Durations clustered around 300 s before and 200 s after the cutover
pub fn improved_dataset() -> Dataset {
    Dataset::with_partitions(
        &[290, 295, 300, 305, 310, 298, 302],
        &[190, 195, 200, 205, 210, 198, 202],
    )
}
