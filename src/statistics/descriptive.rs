// Descriptive statistics over duration samples
//
// Quartiles use aprender's DescriptiveStats (R-7 linear interpolation, the
// same definition spreadsheet tools and pandas use by default). aprender and
// trueno work in f32, so samples are centered on their median before the cast
// and quantiles shifted back in f64. Means stay in f64 through statrs.

use crate::error::{AnalysisError, Result};
use aprender::stats::DescriptiveStats;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use trueno::Vector;

/// Min, quartiles, median and max of a sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// The sample at sorted position n/2 (0 for an empty sample)
pub(crate) fn middle_value(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut scratch = values.to_vec();
    let middle = scratch.len() / 2;
    *scratch.select_nth_unstable_by(middle, f64::total_cmp).1
}

/// Offsets from `center` as f32
///
/// R-7 quantiles and t statistics are shift-invariant, so only the spread
/// has to fit in f32 precision, not the magnitude.
pub(crate) fn offsets_from(values: &[f64], center: f64) -> Vec<f32> {
    values.iter().map(|&v| (v - center) as f32).collect()
}

struct CenteredStats {
    vector: Vector<f32>,
    center: f64,
}

impl CenteredStats {
    fn new(values: &[f64]) -> Self {
        // Centering on a real sample maps a tied middle block to exactly zero
        let center = middle_value(values);
        Self {
            vector: Vector::from_slice(&offsets_from(values, center)),
            center,
        }
    }

    fn quantile(&self, q: f64) -> Result<f64> {
        let stats = DescriptiveStats::new(&self.vector);
        let offset = stats.quantile(q).map_err(quantile_error)?;
        Ok(self.center + f64::from(offset))
    }
}

fn quantile_error<E: std::fmt::Display>(e: E) -> AnalysisError {
    AnalysisError::Statistics(format!("Failed to compute quantile: {}", e))
}

/// First and third quartiles
pub fn quartiles(values: &[f64]) -> Result<(f64, f64)> {
    if values.is_empty() {
        return Err(AnalysisError::Statistics(
            "Cannot compute quartiles of an empty sample".to_string(),
        ));
    }

    let stats = CenteredStats::new(values);
    Ok((stats.quantile(0.25)?, stats.quantile(0.75)?))
}

/// Five-number summary for box plots
pub fn five_number_summary(values: &[f64]) -> Result<FiveNumberSummary> {
    if values.is_empty() {
        return Err(AnalysisError::Statistics(
            "Cannot summarize an empty sample".to_string(),
        ));
    }

    let stats = CenteredStats::new(values);

    Ok(FiveNumberSummary {
        min: Statistics::min(values),
        q1: stats.quantile(0.25)?,
        median: stats.quantile(0.5)?,
        q3: stats.quantile(0.75)?,
        max: Statistics::max(values),
    })
}

/// Arithmetic mean (NaN for an empty sample)
pub fn mean(values: &[f64]) -> f64 {
    values.iter().mean()
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
