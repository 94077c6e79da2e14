//! ally-cutover - did a process change shorten underwriting follow-up?
//!
//! Loads applicant, session and event tables, keeps one underwriting-end and
//! one ally-submission event per completed session, and measures the time
//! between them. Durations are split at a cutover date, cleaned of outliers,
//! and compared with a normality-gated hypothesis test.

pub mod charts;
pub mod cli;
pub mod config;
pub mod csv_output;
pub mod error;
pub mod ingest;
pub mod json_output;
pub mod pipeline;
pub mod records;
pub mod report;
pub mod statistics;
pub mod timestamp;
pub mod verdict;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{AnalysisError, Result};
