// Configuration for the cutover analysis
//
// Every threshold used by the pipeline lives here so a run can be
// reproduced from a single TOML file.

use crate::error::{AnalysisError, Result};
use crate::timestamp::parse_timestamp;
use anyhow::Context;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Date the underwriting flow change took effect
pub const DEFAULT_CUTOVER: &str = "15-03-2259";

/// Configuration for the cutover analysis
///
/// # Example
/// ```
/// use ally_cutover::config::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// assert_eq!(config.significance_level, 0.05);
/// assert_eq!(config.iqr_multiplier, 1.5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Cutover date/time, any format accepted by the normalizer
    ///
    /// Records whose underwriting ended strictly before this instant fall in
    /// the "before" partition.
    pub cutover: String,

    /// Alpha for the two-sample comparison test
    ///
    /// - 0.05 (default): 95% confidence level
    /// - 0.01: stricter, fewer false positives
    pub significance_level: f64,

    /// Alpha for the Shapiro-Wilk normality check
    ///
    /// A partition counts as normal when its p-value is >= this value.
    pub normality_alpha: f64,

    /// Fence multiplier for the IQR outlier filter (Tukey's k)
    pub iqr_multiplier: f64,

    /// Use Student's pooled-variance t-test (true) or Welch's (false)
    pub equal_variance: bool,

    /// Minimum rows per partition before statistical testing
    ///
    /// Shapiro-Wilk needs at least 3 samples.
    pub min_sample_size: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            cutover: DEFAULT_CUTOVER.to_string(),
            significance_level: 0.05,
            normality_alpha: 0.05,
            iqr_multiplier: 1.5,
            equal_variance: true,
            min_sample_size: 3,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a TOML file
    ///
    /// Missing keys fall back to their defaults.
    ///
    /// # Example TOML
    /// ```toml
    /// cutover = "2259-03-15"
    /// significance_level = 0.01
    /// equal_variance = false
    /// ```
    pub fn from_toml<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file: {}", path.as_ref().display())
        })?;
        toml::from_str(&content).with_context(|| "Failed to parse TOML analysis configuration")
    }

    /// Cutover as a timestamp
    pub fn cutover_instant(&self) -> Result<NaiveDateTime> {
        parse_timestamp(&self.cutover).ok_or_else(|| AnalysisError::DateParse {
            field: "cutover",
            value: self.cutover.clone(),
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        for (name, alpha) in [
            ("significance_level", self.significance_level),
            ("normality_alpha", self.normality_alpha),
        ] {
            if !(alpha > 0.0 && alpha < 1.0) {
                return Err(AnalysisError::InvalidConfig(format!(
                    "{} must be in (0, 1), got {}",
                    name, alpha
                )));
            }
        }

        if !(self.iqr_multiplier.is_finite() && self.iqr_multiplier >= 0.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "iqr_multiplier must be non-negative, got {}",
                self.iqr_multiplier
            )));
        }

        if self.min_sample_size < 3 {
            return Err(AnalysisError::InvalidConfig(format!(
                "min_sample_size must be >= 3 for Shapiro-Wilk, got {}",
                self.min_sample_size
            )));
        }

        self.cutover_instant()?;
        Ok(())
    }
}
