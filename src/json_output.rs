//! JSON output format for analysis runs
//!
//! `--format json`: the full report plus a flat summary for scripts.

use crate::pipeline::AnalysisReport;
use crate::statistics::TestMethod;
use crate::verdict::Verdict;
use serde::{Deserialize, Serialize};

/// Headline numbers of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonSummary {
    pub verdict: Verdict,
    pub goal_achieved: bool,
    pub method: TestMethod,
    pub p_value: f64,
    pub mean_before: f64,
    pub mean_after: f64,
    /// Sessions that reached the comparison test
    pub sessions_before: usize,
    pub sessions_after: usize,
}

/// Complete JSON document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutput {
    /// ally-cutover version
    pub version: String,
    /// Output format identifier
    pub format: String,
    pub summary: JsonSummary,
    pub report: AnalysisReport,
}

impl JsonOutput {
    pub fn from_report(report: &AnalysisReport) -> Self {
        let decision = &report.decision;
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "ally-cutover-json-v1".to_string(),
            summary: JsonSummary {
                verdict: decision.verdict,
                goal_achieved: decision.verdict.goal_achieved(),
                method: decision.comparison.method,
                p_value: decision.comparison.p_value,
                mean_before: decision.mean_before,
                mean_after: decision.mean_after,
                sessions_before: report.before.rows.len(),
                sessions_after: report.after.rows.len(),
            },
            report: report.clone(),
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
