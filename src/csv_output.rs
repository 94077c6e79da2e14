//! CSV output of the cleaned duration tables
//!
//! `--format csv`: one row per session that reached the comparison test,
//! both partitions in one file. This is the feed for external plotting.

use crate::pipeline::{AnalysisReport, OutlierFiltered};
use crate::records::{Period, SessionDuration};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// CSV record for a single session duration
#[derive(Debug, Clone, PartialEq)]
pub struct CsvDuration {
    pub period: Period,
    pub session_id: String,
    pub applicant_id: String,
    pub end_time: String,
    pub ally_time: String,
    pub duration_seconds: f64,
}

impl CsvDuration {
    pub fn new(period: Period, row: &SessionDuration) -> Self {
        Self {
            period,
            session_id: row.session_id.clone(),
            applicant_id: row.applicant_id.clone(),
            end_time: row.end_time.format(TIMESTAMP_FORMAT).to_string(),
            ally_time: row.ally_time.format(TIMESTAMP_FORMAT).to_string(),
            duration_seconds: row.duration_seconds,
        }
    }
}

/// CSV output formatter
#[derive(Debug, Default)]
pub struct CsvOutput {
    rows: Vec<CsvDuration>,
}

impl CsvOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Both partitions of a report, before first
    pub fn from_report(report: &AnalysisReport) -> Self {
        let mut output = Self::new();
        output.add_partition(&report.before);
        output.add_partition(&report.after);
        output
    }

    pub fn add_partition(&mut self, partition: &OutlierFiltered) {
        self.rows.extend(
            partition
                .rows
                .iter()
                .map(|row| CsvDuration::new(partition.period, row)),
        );
    }

    fn header() -> &'static str {
        "period,session_id,applicant_id,end_time,ally_time,duration_seconds"
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn format_row(row: &CsvDuration) -> String {
        [
            row.period.to_string(),
            Self::escape_field(&row.session_id),
            Self::escape_field(&row.applicant_id),
            row.end_time.clone(),
            row.ally_time.clone(),
            row.duration_seconds.to_string(),
        ]
        .join(",")
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::new();
        output.push_str(Self::header());
        output.push('\n');

        for row in &self.rows {
            output.push_str(&Self::format_row(row));
            output.push('\n');
        }

        output
    }
}
