// Plain-language rendering of an analysis run
//
// Decision logic stays in `verdict`; this module only turns values into text.

use crate::pipeline::{AnalysisReport, CleaningAudit};
use crate::statistics::NormalityTest;
use crate::verdict::Verdict;
use chrono::NaiveDateTime;

/// Cutover as printed in the verdict ("15/03/2259")
pub fn cutover_label(cutover: NaiveDateTime) -> String {
    cutover.format("%d/%m/%Y").to_string()
}

/// Verdict paragraph for the given means
pub fn verdict_message(
    verdict: Verdict,
    cutover: &str,
    mean_before: f64,
    mean_after: f64,
) -> String {
    let mut text = String::new();

    match verdict {
        Verdict::NoSignificantChange => {
            text.push_str("The changes are not statistically significant. ");
            text.push_str("The average time did not change after the process change.\n");
            return text;
        }
        Verdict::SignificantImprovement | Verdict::SignificantRegression => {
            text.push_str("The changes are statistically significant.\n\n");
            text.push_str(&format!(
                "The mean value of the time spent before {}: {} seconds. After: {} seconds.\n\n",
                cutover, mean_before, mean_after
            ));
            text.push_str(&format!(
                "The average time spent filling in the test results form before {}\n",
                cutover
            ));
        }
    }

    if verdict.goal_achieved() {
        text.push_str(&format!("is BIGGER than the same value after {}.\n\n", cutover));
        text.push_str("✅ FINAL RESULT: The goal has been achieved:\n");
        text.push_str(
            "the change in the underwriting flow on the ally side ACHIEVED the purpose \
             of shortening the time to fill in the test results form.\n",
        );
    } else {
        text.push_str(&format!("is NOT GREATER than the same value after {}.\n\n", cutover));
        text.push_str("❌ FINAL RESULT: Unfortunately, the goal hasn't been achieved:\n");
        text.push_str(
            "the change in the underwriting flow on the ally side HASN'T ACHIEVED the \
             purpose of shortening the time to fill in the test results form.\n",
        );
        text.push_str(
            "The time to fill in the test results form has not become shorter on average.\n",
        );
    }

    text
}

fn normality_line(label: &str, test: &NormalityTest, alpha: f64) -> String {
    format!(
        "  {:<7} n={:<6} W={:.4} p={:.4} ({})\n",
        label,
        test.sample_size,
        test.statistic,
        test.p_value,
        if test.is_normal(alpha) {
            "normal"
        } else {
            "not normal"
        }
    )
}

fn audit_section(audit: &CleaningAudit) -> String {
    let mut text = String::from("🧹 Cleaning audit:\n");
    let f = &audit.filter;
    let lines = [
        ("Sessions not completed", f.sessions_not_completed),
        ("Events outside completed sessions", f.events_outside_completed),
        ("Duplicate events", f.duplicate_events),
        ("Irrelevant events", f.irrelevant_events),
        ("Sessions missing an event type", f.unpaired_sessions),
        ("Superseded events", f.superseded_events),
        ("Non-positive durations", audit.durations.non_positive),
        ("Outliers before", audit.outliers_before),
        ("Outliers after", audit.outliers_after),
    ];
    for (label, count) in lines {
        text.push_str(&format!("  {:<36} {}\n", label, count));
    }
    text.push_str(&format!(
        "  {:<36} {} before / {} after\n",
        "Sessions tested",
        audit.before_rows - audit.outliers_before,
        audit.after_rows - audit.outliers_after
    ));
    text
}

impl AnalysisReport {
    /// Generate human-readable report
    pub fn to_report_string(&self) -> String {
        let label = cutover_label(self.cutover);
        let decision = &self.decision;
        let mut report = String::new();

        report.push_str(&format!("📅 Cutover: {}\n\n", label));

        report.push_str("📊 Shapiro-Wilk normality:\n");
        let alpha = self.config.normality_alpha;
        report.push_str(&normality_line("before", &decision.normality_before, alpha));
        report.push_str(&normality_line("after", &decision.normality_after, alpha));
        report.push_str(&format!(
            "\n🔬 {}: statistic={:.4}, p={:.6} (alpha={})\n\n",
            decision.comparison.method,
            decision.comparison.statistic,
            decision.comparison.p_value,
            self.config.significance_level
        ));

        report.push_str(&verdict_message(
            decision.verdict,
            &label,
            decision.mean_before,
            decision.mean_after,
        ));

        report.push('\n');
        report.push_str(&audit_section(&self.audit));
        report
    }
}
