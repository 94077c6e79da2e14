//! Error types for the cutover analysis pipeline
//!
//! Only genuine failures live here. Rows that the cleaning policy drops on
//! purpose (duplicates, unpaired sessions, non-positive durations, outliers)
//! are counted in the audit structs instead.

use crate::records::Period;
use thiserror::Error;

/// Errors raised by the analysis pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Failed to parse {field} value '{value}' as a date/time")]
    DateParse { field: &'static str, value: String },

    #[error("Partition '{period}' is empty after cleaning")]
    EmptyPartition { period: Period },

    #[error("Partition '{period}' has {actual} samples, need at least {required}")]
    InsufficientSamples {
        period: Period,
        required: usize,
        actual: usize,
    },

    #[error("Statistical test failed: {0}")]
    Statistics(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
