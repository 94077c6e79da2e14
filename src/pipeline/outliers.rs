//! Outlier remover: Tukey fences on `duration_seconds`, per partition
//!
//! Fences are computed and compared in f64. Values on a fence are kept.

use crate::error::{AnalysisError, Result};
use crate::records::{Period, SessionDuration};
use crate::statistics::quartiles;
use serde::{Deserialize, Serialize};

/// Quartiles and fences of one partition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IqrBounds {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
}

impl IqrBounds {
    /// Fences `[q1 - k·iqr, q3 + k·iqr]`
    pub fn from_quartiles(q1: f64, q3: f64, multiplier: f64) -> Self {
        let iqr = q3 - q1;
        Self {
            q1,
            q3,
            iqr,
            lower: q1 - multiplier * iqr,
            upper: q3 + multiplier * iqr,
        }
    }

    /// Inclusive on both fences
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// A partition after outlier removal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierFiltered {
    pub period: Period,
    pub rows: Vec<SessionDuration>,
    pub bounds: IqrBounds,
    pub removed: usize,
}

impl OutlierFiltered {
    pub fn durations(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.duration_seconds).collect()
    }
}

/// Drop rows outside the Tukey fences of `rows`
///
/// # Errors
/// `EmptyPartition` when `rows` is empty.
pub fn remove_outliers(
    period: Period,
    rows: &[SessionDuration],
    multiplier: f64,
) -> Result<OutlierFiltered> {
    if rows.is_empty() {
        return Err(AnalysisError::EmptyPartition { period });
    }

    let durations: Vec<f64> = rows.iter().map(|r| r.duration_seconds).collect();
    let (q1, q3) = quartiles(&durations)?;
    let bounds = IqrBounds::from_quartiles(q1, q3, multiplier);

    let kept: Vec<SessionDuration> = rows
        .iter()
        .filter(|r| bounds.contains(r.duration_seconds))
        .cloned()
        .collect();
    let removed = rows.len() - kept.len();

    tracing::info!(
        %period,
        q1 = bounds.q1,
        q3 = bounds.q3,
        lower = bounds.lower,
        upper = bounds.upper,
        removed,
        kept = kept.len(),
        "Removed duration outliers"
    );

    Ok(OutlierFiltered {
        period,
        rows: kept,
        bounds,
        removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rows(durations: &[f64]) -> Vec<SessionDuration> {
        let base = NaiveDate::from_ymd_opt(2259, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        durations
            .iter()
            .enumerate()
            .map(|(i, &d)| SessionDuration {
                session_id: format!("S{}", i),
                applicant_id: format!("A{}", i),
                end_time: base,
                ally_time: base + chrono::Duration::milliseconds((d * 1000.0) as i64),
                duration_seconds: d,
            })
            .collect()
    }

    #[test]
    fn test_extreme_value_removed() {
        let input = rows(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0, 1000.0]);
        let filtered = remove_outliers(Period::Before, &input, 1.5).unwrap();
        assert_eq!(filtered.removed, 1);
        assert!(filtered.rows.iter().all(|r| r.duration_seconds < 1000.0));
        assert_eq!(filtered.period, Period::Before);
    }

    #[test]
    fn test_bounds_for_one_to_eight() {
        // Q1 = 2.75, Q3 = 6.25, IQR = 3.5
        let input = rows(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        let filtered = remove_outliers(Period::After, &input, 1.5).unwrap();
        assert!((filtered.bounds.iqr - 3.5).abs() < 1e-5);
        assert!((filtered.bounds.lower - -2.5).abs() < 1e-5);
        assert!((filtered.bounds.upper - 11.5).abs() < 1e-5);
        assert_eq!(filtered.removed, 0);
    }

    #[test]
    fn test_fences_are_inclusive() {
        // Q1 = 2, Q3 = 4 for [1..=5]; with k = 0 the fences are exactly 2 and 4
        let input = rows(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let filtered = remove_outliers(Period::Before, &input, 0.0).unwrap();
        let kept: Vec<f64> = filtered.durations();
        assert_eq!(kept, vec![2.0, 3.0, 4.0]);
        assert_eq!(filtered.removed, 2);
    }

    #[test]
    fn test_value_just_above_fence_removed() {
        // Q1 = 1000.5, Q3 = 1002.5, upper fence 1005.5
        let input = rows(&[1000.0, 1000.5, 1001.0, 1002.5, 1005.50002]);
        let filtered = remove_outliers(Period::Before, &input, 1.5).unwrap();
        assert!((filtered.bounds.upper - 1005.5).abs() < 1e-5);
        assert_eq!(filtered.removed, 1);
        assert_eq!(filtered.durations(), vec![1000.0, 1000.5, 1001.0, 1002.5]);
    }

    #[test]
    fn test_constant_partition_kept_whole() {
        let filtered = remove_outliers(Period::After, &rows(&[60.0; 6]), 1.5).unwrap();
        assert_eq!(filtered.removed, 0);
        assert_eq!(filtered.bounds.lower, 60.0);
        assert_eq!(filtered.bounds.upper, 60.0);
    }

    #[test]
    fn test_single_row_kept() {
        let filtered = remove_outliers(Period::After, &rows(&[42.0]), 1.5).unwrap();
        assert_eq!(filtered.rows.len(), 1);
        assert_eq!(filtered.bounds.iqr, 0.0);
    }

    #[test]
    fn test_order_preserved() {
        let input = rows(&[30.0, 10.0, 20.0]);
        let filtered = remove_outliers(Period::Before, &input, 1.5).unwrap();
        assert_eq!(filtered.durations(), vec![30.0, 10.0, 20.0]);
    }

    #[test]
    fn test_empty_partition_is_error() {
        assert_eq!(
            remove_outliers(Period::After, &[], 1.5).unwrap_err(),
            AnalysisError::EmptyPartition {
                period: Period::After
            }
        );
    }
}
