//! CSV loading for the applicants, sessions and events tables
//!
//! Columns are located by header name, so extra columns are ignored and
//! column order doesn't matter. Quoting follows RFC 4180: fields may be
//! wrapped in double quotes, embedded quotes are doubled, and quoted fields
//! may contain commas and newlines.

use crate::records::{RawApplicant, RawEvent, RawSession, RawTables};
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// A parsed CSV document: header plus rows of equal width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Parse CSV text with a mandatory header row
    pub fn parse(content: &str) -> Result<Self> {
        let mut records = split_records(content)?.into_iter();

        let Some((_, header)) = records.next() else {
            bail!("CSV input is empty (expected a header row)");
        };
        let header: Vec<String> = header.into_iter().map(|h| h.trim().to_string()).collect();

        let mut rows = Vec::new();
        for (line, fields) in records {
            if fields.len() != header.len() {
                bail!(
                    "Line {}: expected {} fields, found {}",
                    line,
                    header.len(),
                    fields.len()
                );
            }
            rows.push(fields);
        }

        Ok(Self { header, rows })
    }

    /// Index of a named column
    pub fn column(&self, name: &str) -> Result<usize> {
        self.header
            .iter()
            .position(|h| h == name)
            .with_context(|| {
                format!(
                    "Missing required column '{}' (found: {})",
                    name,
                    self.header.join(", ")
                )
            })
    }
}

/// Split CSV text into records, tracking the line each record starts on
fn split_records(content: &str) -> Result<Vec<(usize, Vec<String>)>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                // Blank lines carry no record
                if !(fields.len() == 1 && fields[0].is_empty()) {
                    records.push((record_line, std::mem::take(&mut fields)));
                }
                fields.clear();
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        bail!("Line {}: unterminated quoted field", record_line);
    }
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        records.push((record_line, fields));
    }

    Ok(records)
}

fn read_table(path: &Path) -> Result<CsvTable> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read CSV file: {}", path.display()))?;
    CsvTable::parse(&content)
        .with_context(|| format!("Failed to parse CSV file: {}", path.display()))
}

/// Convert a parsed table into applicant rows
pub fn applicants_from_table(table: &CsvTable) -> Result<Vec<RawApplicant>> {
    let id = table.column("applicant_id")?;
    let birth = table.column("birth_date")?;

    Ok(table
        .rows
        .iter()
        .map(|row| RawApplicant {
            applicant_id: row[id].trim().to_string(),
            birth_date: row[birth].clone(),
        })
        .collect())
}

/// Convert a parsed table into session rows
///
/// `risk_class_decision_datetime` is optional in the file; a missing column
/// reads as empty cells.
pub fn sessions_from_table(table: &CsvTable) -> Result<Vec<RawSession>> {
    let id = table.column("session_id")?;
    let status = table.column("session_status")?;
    let decision = table.column("risk_class_decision_datetime").ok();

    Ok(table
        .rows
        .iter()
        .map(|row| RawSession {
            session_id: row[id].trim().to_string(),
            session_status: row[status].clone(),
            risk_class_decision_datetime: decision.map(|c| row[c].clone()).unwrap_or_default(),
        })
        .collect())
}

/// Convert a parsed table into event rows
pub fn events_from_table(table: &CsvTable) -> Result<Vec<RawEvent>> {
    let session = table.column("session_id")?;
    let applicant = table.column("applicant_id")?;
    let kind = table.column("event_type")?;
    let when = table.column("event_datetime")?;

    Ok(table
        .rows
        .iter()
        .map(|row| RawEvent {
            session_id: row[session].trim().to_string(),
            applicant_id: row[applicant].trim().to_string(),
            event_type: row[kind].clone(),
            event_datetime: row[when].clone(),
        })
        .collect())
}

/// Load all three tables from CSV files
pub fn load_tables(applicants: &Path, sessions: &Path, events: &Path) -> Result<RawTables> {
    let applicants = applicants_from_table(&read_table(applicants)?)
        .with_context(|| format!("Invalid applicants table: {}", applicants.display()))?;
    let sessions = sessions_from_table(&read_table(sessions)?)
        .with_context(|| format!("Invalid sessions table: {}", sessions.display()))?;
    let events = events_from_table(&read_table(events)?)
        .with_context(|| format!("Invalid events table: {}", events.display()))?;

    tracing::debug!(
        applicants = applicants.len(),
        sessions = sessions.len(),
        events = events.len(),
        "Loaded input tables"
    );

    Ok(RawTables {
        applicants,
        sessions,
        events,
    })
}
