// Shapiro-Wilk normality test
//
// Royston, P. (1995). Remark AS R94: A remark on algorithm AS 181: The
// W-test for normality. Applied Statistics 44(4), 547-551.
//
// Coefficients come from Royston's polynomial approximation to the expected
// normal order statistics; the p-value from his normalizing transformation
// of W (separate fits for n <= 11 and n > 11, exact formula for n = 3).
// Accurate for 3 <= n <= 5000.

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use statrs::statistics::Statistics;

const SMALL: f64 = 1e-19;
const LARGE_SAMPLE: usize = 5000;

// 6/pi and pi/3 for the exact n = 3 p-value
const PI6: f64 = 1.909_859_317_102_74;
const STQR: f64 = 1.047_197_551_196_6;

const G: [f64; 2] = [-2.273, 0.459];
const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.071190, 4.434685, -2.706056];
const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const C3: [f64; 4] = [0.5440, -0.39978, 0.025054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];

/// Result of a Shapiro-Wilk test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalityTest {
    /// W statistic in (0, 1]
    pub statistic: f64,
    /// Probability of a W this small under the normal null hypothesis
    pub p_value: f64,
    pub sample_size: usize,
}

impl NormalityTest {
    /// Null hypothesis (normality) not rejected at `alpha`
    pub fn is_normal(&self, alpha: f64) -> bool {
        self.p_value >= alpha
    }
}

/// Evaluate `c[0] + c[1]·x + c[2]·x² + …`
fn poly(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

fn standard_normal() -> Result<Normal> {
    Normal::new(0.0, 1.0).map_err(|e| AnalysisError::Statistics(e.to_string()))
}

/// The n/2 positive Shapiro-Wilk coefficients, largest first
fn coefficients(n: usize, normal: &Normal) -> Vec<f64> {
    let half = n / 2;
    if n == 3 {
        return vec![0.5f64.sqrt()];
    }

    let an = n as f64;
    let m: Vec<f64> = (1..=half)
        .map(|i| normal.inverse_cdf((i as f64 - 0.375) / (an + 0.25)))
        .collect();

    let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / an.sqrt();
    let a1 = poly(&C1, rsn) - m[0] / ssumm2;

    let mut a = vec![0.0; half];
    let (first_free, fac) = if n > 5 {
        let a2 = -m[1] / ssumm2 + poly(&C2, rsn);
        let fac = ((summ2 - 2.0 * m[0] * m[0] - 2.0 * m[1] * m[1])
            / (1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2))
            .sqrt();
        a[1] = a2;
        (2, fac)
    } else {
        let fac = ((summ2 - 2.0 * m[0] * m[0]) / (1.0 - 2.0 * a1 * a1)).sqrt();
        (1, fac)
    };
    a[0] = a1;
    for i in first_free..half {
        a[i] = -m[i] / fac;
    }
    a
}

fn p_value(w: f64, n: usize, normal: &Normal) -> f64 {
    if n == 3 {
        return (PI6 * (w.sqrt().asin() - STQR)).clamp(0.0, 1.0);
    }

    let w1 = 1.0 - w;
    if w1 <= 0.0 {
        return 1.0;
    }

    let an = n as f64;
    let mut y = w1.ln();
    let (m, s) = if n <= 11 {
        let gamma = poly(&G, an);
        if y >= gamma {
            return SMALL;
        }
        y = -(gamma - y).ln();
        (poly(&C3, an), poly(&C4, an).exp())
    } else {
        let xx = an.ln();
        (poly(&C5, xx), poly(&C6, xx).exp())
    };

    normal.sf((y - m) / s)
}

/// Run the Shapiro-Wilk test on a sample
///
/// # Errors
/// Fewer than 3 values, or any non-finite value.
///
/// A sample with zero range is reported as W = 1, p = 1.
///
/// # Example
/// ```
/// use ally_cutover::statistics::shapiro_wilk;
///
/// let heights = [148.0, 154.0, 158.0, 160.0, 161.0, 162.0, 166.0, 170.0, 182.0, 195.0, 236.0];
/// let result = shapiro_wilk(&heights).unwrap();
/// assert!((result.statistic - 0.7888).abs() < 1e-3);
/// assert!(!result.is_normal(0.05));
/// ```
pub fn shapiro_wilk(samples: &[f64]) -> Result<NormalityTest> {
    let n = samples.len();
    if n < 3 {
        return Err(AnalysisError::Statistics(format!(
            "Shapiro-Wilk needs at least 3 samples, got {}",
            n
        )));
    }
    if samples.iter().any(|v| !v.is_finite()) {
        return Err(AnalysisError::Statistics(
            "Shapiro-Wilk received a non-finite sample".to_string(),
        ));
    }
    if n > LARGE_SAMPLE {
        tracing::warn!(
            n,
            "Shapiro-Wilk p-value may be inaccurate for more than {} samples",
            LARGE_SAMPLE
        );
    }

    let mut x = samples.to_vec();
    x.sort_by(f64::total_cmp);

    if x[n - 1] - x[0] < SMALL {
        tracing::debug!(n, "Zero-range sample treated as normal");
        return Ok(NormalityTest {
            statistic: 1.0,
            p_value: 1.0,
            sample_size: n,
        });
    }

    let normal = standard_normal()?;
    let a = coefficients(n, &normal);

    let mean = x.iter().mean();
    let ssq: f64 = x.iter().map(|v| (v - mean).powi(2)).sum();
    let numerator: f64 = a
        .iter()
        .enumerate()
        .map(|(i, coef)| coef * (x[n - 1 - i] - x[i]))
        .sum();
    let w = (numerator * numerator / ssq).min(1.0);

    Ok(NormalityTest {
        statistic: w,
        p_value: p_value(w, n, &normal),
        sample_size: n,
    })
}
