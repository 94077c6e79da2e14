// Two-sample comparison tests
//
// - Parametric: aprender's `ttest_ind` (Student's pooled variance or Welch's)
// - Non-parametric: two-sided Mann-Whitney U
//
// Mann-Whitney uses the exact null distribution of U when either sample has
// at most 8 values and there are no ties; otherwise the normal approximation
// with tie correction and a 0.5 continuity correction.

use super::descriptive::{middle_value, offsets_from};
use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use std::fmt;

const EXACT_MAX_SMALLER_SAMPLE: usize = 8;

/// Which comparison test produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestMethod {
    /// Student's t-test, pooled variance
    StudentT,
    /// Welch's t-test, unequal variances
    WelchT,
    /// Mann-Whitney U rank-sum test
    MannWhitneyU,
}

impl TestMethod {
    pub fn is_parametric(&self) -> bool {
        !matches!(self, TestMethod::MannWhitneyU)
    }
}

impl fmt::Display for TestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestMethod::StudentT => write!(f, "Student's t-test"),
            TestMethod::WelchT => write!(f, "Welch's t-test"),
            TestMethod::MannWhitneyU => write!(f, "Mann-Whitney U test"),
        }
    }
}

/// Result of a two-sample comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonTest {
    pub method: TestMethod,
    /// t for the t-tests, U of the first sample for Mann-Whitney
    pub statistic: f64,
    /// Two-sided p-value
    pub p_value: f64,
}

/// Independent two-sample t-test
///
/// `equal_variance = true` runs Student's test, `false` runs Welch's. Both
/// samples are shifted by the same pooled value before aprender's f32 math.
/// Two identical constant samples give a NaN statistic and p-value.
///
/// # Example
/// ```
/// use ally_cutover::statistics::{t_test, TestMethod};
///
/// let before = [10.0, 12.0, 11.0, 13.0, 10.0];
/// let after = [25.0, 27.0, 26.0, 28.0, 25.0];
/// let result = t_test(&before, &after, false).unwrap();
/// assert_eq!(result.method, TestMethod::WelchT);
/// assert!(result.p_value < 0.05);
/// ```
pub fn t_test(first: &[f64], second: &[f64], equal_variance: bool) -> Result<ComparisonTest> {
    if first.len() < 2 || second.len() < 2 {
        return Err(AnalysisError::Statistics(
            "Need at least 2 samples per group for a t-test".to_string(),
        ));
    }

    let pooled: Vec<f64> = first.iter().chain(second).copied().collect();
    let center = middle_value(&pooled);
    let first = offsets_from(first, center);
    let second = offsets_from(second, center);

    let result = aprender::stats::hypothesis::ttest_ind(&first, &second, equal_variance)
        .map_err(|e| AnalysisError::Statistics(format!("Failed to compute t-test: {}", e)))?;

    Ok(ComparisonTest {
        method: if equal_variance {
            TestMethod::StudentT
        } else {
            TestMethod::WelchT
        },
        statistic: result.statistic as f64,
        p_value: result.pvalue as f64,
    })
}

/// Average ranks (1-based) of the pooled sample plus the tie term Σ(t³ - t)
fn rank_sum_first(first: &[f64], second: &[f64]) -> (f64, f64) {
    let mut pooled: Vec<(f64, bool)> = first
        .iter()
        .map(|&v| (v, true))
        .chain(second.iter().map(|&v| (v, false)))
        .collect();
    pooled.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut rank_sum = 0.0;
    let mut tie_term = 0.0;
    let mut start = 0;
    while start < pooled.len() {
        let mut end = start;
        while end + 1 < pooled.len() && pooled[end + 1].0 == pooled[start].0 {
            end += 1;
        }

        // Ranks start..=end (0-based) share the average 1-based rank
        let average_rank = (start + end) as f64 / 2.0 + 1.0;
        let from_first = pooled[start..=end].iter().filter(|(_, f)| *f).count();
        rank_sum += average_rank * from_first as f64;

        let t = (end - start + 1) as f64;
        tie_term += t * t * t - t;
        start = end + 1;
    }

    (rank_sum, tie_term)
}

/// Frequencies of U under the null for sample sizes (m, n)
///
/// Coefficients of the Gaussian binomial [m + n choose m]_q, built one factor
/// (1 - q^(n+k)) / (1 - q^k) at a time.
fn u_distribution(m: usize, n: usize) -> Vec<f64> {
    let (m, n) = if m <= n { (m, n) } else { (n, m) };
    let mut counts = vec![1.0];

    for k in 1..=m {
        counts.resize(counts.len() + n, 0.0);
        let shift = n + k;
        for u in (shift..counts.len()).rev() {
            counts[u] -= counts[u - shift];
        }
        for u in k..counts.len() {
            counts[u] += counts[u - k];
        }
    }

    counts
}

/// P(U >= u) under the null
fn exact_survival(u: f64, m: usize, n: usize) -> f64 {
    let counts = u_distribution(m, n);
    let total: f64 = counts.iter().sum();
    let from = (u.ceil().max(0.0) as usize).min(counts.len());
    counts[from..].iter().sum::<f64>() / total
}

/// Two-sided Mann-Whitney U test
///
/// # Example
/// ```
/// use ally_cutover::statistics::mann_whitney_u;
///
/// let result = mann_whitney_u(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
/// assert_eq!(result.statistic, 0.0);
/// assert!((result.p_value - 0.1).abs() < 1e-12);
/// ```
pub fn mann_whitney_u(first: &[f64], second: &[f64]) -> Result<ComparisonTest> {
    let (n1, n2) = (first.len(), second.len());
    if n1 == 0 || n2 == 0 {
        return Err(AnalysisError::Statistics(
            "Mann-Whitney U needs non-empty samples".to_string(),
        ));
    }
    if first.iter().chain(second).any(|v| !v.is_finite()) {
        return Err(AnalysisError::Statistics(
            "Mann-Whitney U received a non-finite sample".to_string(),
        ));
    }

    let (rank_sum, tie_term) = rank_sum_first(first, second);
    let (f1, f2) = (n1 as f64, n2 as f64);
    let u1 = rank_sum - f1 * (f1 + 1.0) / 2.0;
    let u2 = f1 * f2 - u1;
    let u = u1.max(u2);

    let exact = n1.min(n2) <= EXACT_MAX_SMALLER_SAMPLE && tie_term == 0.0;
    let p_value = if exact {
        2.0 * exact_survival(u, n1, n2)
    } else {
        let n = f1 + f2;
        let mu = f1 * f2 / 2.0;
        let sigma = (f1 * f2 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)))).sqrt();
        if sigma > 0.0 {
            let normal =
                Normal::new(0.0, 1.0).map_err(|e| AnalysisError::Statistics(e.to_string()))?;
            2.0 * normal.sf((u - mu - 0.5) / sigma)
        } else {
            // Every value identical
            1.0
        }
    };

    tracing::trace!(u1, u2, tie_term, exact, p_value, "Mann-Whitney U");

    Ok(ComparisonTest {
        method: TestMethod::MannWhitneyU,
        statistic: u1,
        p_value: p_value.clamp(0.0, 1.0),
    })
}
