// Statistical decision engine
//
// Normality-gated test selection:
// - Shapiro-Wilk on each partition
// - Both normal → t-test (Student's or Welch's), otherwise Mann-Whitney U
// - Exactly one comparison test per run
//
// The verdict is a plain value. Rendering lives in `report`.

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::records::Period;
use crate::statistics::{
    mann_whitney_u, mean, round_to, shapiro_wilk, t_test, ComparisonTest, NormalityTest,
};
use serde::{Deserialize, Serialize};

const MEAN_DECIMALS: i32 = 3;

/// Outcome of the before/after comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Significant difference and durations got shorter: goal achieved
    SignificantImprovement,
    /// Significant difference but durations didn't get shorter
    SignificantRegression,
    /// p-value at or above the significance level, or undefined
    NoSignificantChange,
}

impl Verdict {
    /// Pure decision rule
    ///
    /// # Example
    /// ```
    /// use ally_cutover::verdict::Verdict;
    ///
    /// assert_eq!(Verdict::decide(0.01, 300.0, 200.0, 0.05), Verdict::SignificantImprovement);
    /// assert_eq!(Verdict::decide(0.01, 200.0, 300.0, 0.05), Verdict::SignificantRegression);
    /// assert_eq!(Verdict::decide(0.05, 300.0, 200.0, 0.05), Verdict::NoSignificantChange);
    /// assert_eq!(Verdict::decide(f64::NAN, 60.0, 60.0, 0.05), Verdict::NoSignificantChange);
    /// ```
    pub fn decide(p_value: f64, mean_before: f64, mean_after: f64, alpha: f64) -> Self {
        // A NaN p-value is never significant
        if p_value.is_nan() || p_value >= alpha {
            Verdict::NoSignificantChange
        } else if mean_before > mean_after {
            Verdict::SignificantImprovement
        } else {
            Verdict::SignificantRegression
        }
    }

    pub fn is_significant(&self) -> bool {
        !matches!(self, Verdict::NoSignificantChange)
    }

    pub fn goal_achieved(&self) -> bool {
        matches!(self, Verdict::SignificantImprovement)
    }
}

/// Everything the decision engine computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticalDecision {
    pub normality_before: NormalityTest,
    pub normality_after: NormalityTest,
    pub comparison: ComparisonTest,
    /// Rounded to 3 decimals
    pub mean_before: f64,
    /// Rounded to 3 decimals
    pub mean_after: f64,
    pub verdict: Verdict,
}

impl StatisticalDecision {
    pub fn both_normal(&self, alpha: f64) -> bool {
        self.normality_before.is_normal(alpha) && self.normality_after.is_normal(alpha)
    }
}

fn check_sample_size(period: Period, samples: &[f64], required: usize) -> Result<()> {
    if samples.len() < required {
        return Err(AnalysisError::InsufficientSamples {
            period,
            required,
            actual: samples.len(),
        });
    }
    Ok(())
}

/// Compare the cleaned before/after durations
///
/// # Errors
/// `InsufficientSamples` when either side has fewer than
/// `config.min_sample_size` values; `Statistics` if a test can't run.
pub fn decide(
    before: &[f64],
    after: &[f64],
    config: &AnalysisConfig,
) -> Result<StatisticalDecision> {
    check_sample_size(Period::Before, before, config.min_sample_size)?;
    check_sample_size(Period::After, after, config.min_sample_size)?;

    let normality_before = shapiro_wilk(before)?;
    let normality_after = shapiro_wilk(after)?;
    let parametric = normality_before.is_normal(config.normality_alpha)
        && normality_after.is_normal(config.normality_alpha);

    tracing::debug!(
        before_w = normality_before.statistic,
        before_p = normality_before.p_value,
        after_w = normality_after.statistic,
        after_p = normality_after.p_value,
        parametric,
        "Normality check"
    );

    let comparison = if parametric {
        t_test(before, after, config.equal_variance)?
    } else {
        mann_whitney_u(before, after)?
    };

    let mean_before = round_to(mean(before), MEAN_DECIMALS);
    let mean_after = round_to(mean(after), MEAN_DECIMALS);
    let verdict = Verdict::decide(
        comparison.p_value,
        mean_before,
        mean_after,
        config.significance_level,
    );

    tracing::info!(
        method = %comparison.method,
        statistic = comparison.statistic,
        p_value = comparison.p_value,
        mean_before,
        mean_after,
        ?verdict,
        "Comparison complete"
    );

    Ok(StatisticalDecision {
        normality_before,
        normality_after,
        comparison,
        mean_before,
        mean_after,
        verdict,
    })
}
