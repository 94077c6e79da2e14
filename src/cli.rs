//! CLI argument parsing for ally-cutover

use crate::config::AnalysisConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the analysis result
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable verdict and cleaning audit (default)
    Text,
    /// Full report as JSON for machine parsing
    Json,
    /// Cleaned duration tables as CSV for plotting
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "ally-cutover")]
#[command(version)]
#[command(
    about = "Did the underwriting flow change shorten the time to submit test results?",
    long_about = None
)]
pub struct Cli {
    /// Applicants table (CSV with applicant_id, birth_date)
    #[arg(long, value_name = "FILE")]
    pub applicants: PathBuf,

    /// Sessions table (CSV with session_id, session_status, risk_class_decision_datetime)
    #[arg(long, value_name = "FILE")]
    pub sessions: PathBuf,

    /// Events table (CSV with session_id, applicant_id, event_type, event_datetime)
    #[arg(long, value_name = "FILE")]
    pub events: PathBuf,

    /// Cutover date/time (default: 15-03-2259, day-first)
    #[arg(long, value_name = "DATE")]
    pub cutover: Option<String>,

    /// Significance level for the comparison test (default: 0.05)
    #[arg(long = "alpha", value_name = "P")]
    pub significance_level: Option<f64>,

    /// Use Welch's t-test instead of Student's when both partitions are normal
    #[arg(long)]
    pub welch: bool,

    /// Analysis configuration file (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Print a histogram and box plot of each partition (text format only)
    #[arg(long)]
    pub charts: bool,

    /// Histogram bin count for --charts
    #[arg(long, value_name = "N", default_value = "20")]
    pub bins: usize,

    /// Enable debug tracing output to stderr
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Apply command-line overrides on top of a base configuration
    pub fn apply_overrides(&self, mut config: AnalysisConfig) -> AnalysisConfig {
        if let Some(cutover) = &self.cutover {
            config.cutover = cutover.clone();
        }
        if let Some(alpha) = self.significance_level {
            config.significance_level = alpha;
        }
        if self.welch {
            config.equal_variance = false;
        }
        config
    }
}
