// Cutover analysis pipeline
//
// Each stage is a pure function from the previous stage's output to a new
// value:
//
//   RawTables
//     → normalize        (typed records, parsed timestamps, sorted events)
//     → filter_events    (completed sessions, one event of each type)
//     → compute_durations
//     → split_at_cutover
//     → remove_outliers  (per partition)
//     → verdict::decide
//
// `run_analysis` chains them and collects every stage's audit counts.

mod duration;
mod filter;
mod normalize;
mod outliers;
mod split;

pub use duration::{compute_durations, DurationAudit, DurationTable};
pub use filter::{filter_events, FilterAudit, FilteredEvents};
pub use normalize::{normalize, NormalizedTables};
pub use outliers::{remove_outliers, IqrBounds, OutlierFiltered};
pub use split::{period_of, split_at_cutover, Partitions};

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::records::{Period, RawTables};
use crate::verdict::{decide, StatisticalDecision};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Row counts dropped or retained by each cleaning stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningAudit {
    pub filter: FilterAudit,
    pub durations: DurationAudit,
    /// Rows per partition before outlier removal
    pub before_rows: usize,
    pub after_rows: usize,
    pub outliers_before: usize,
    pub outliers_after: usize,
}

impl CleaningAudit {
    /// Rows excluded for any reason after the join
    pub fn total_excluded_durations(&self) -> usize {
        self.durations.non_positive + self.outliers_before + self.outliers_after
    }
}

/// Full result of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub cutover: NaiveDateTime,
    pub config: AnalysisConfig,
    pub audit: CleaningAudit,
    pub before: OutlierFiltered,
    pub after: OutlierFiltered,
    pub decision: StatisticalDecision,
}

impl AnalysisReport {
    pub fn partition(&self, period: Period) -> &OutlierFiltered {
        match period {
            Period::Before => &self.before,
            Period::After => &self.after,
        }
    }
}

/// Run every stage on the raw tables
///
/// # Errors
/// Invalid configuration, unparseable dates, an empty partition, or too few
/// samples left for testing.
///
/// # Example
/// ```
/// use ally_cutover::config::AnalysisConfig;
/// use ally_cutover::pipeline::run_analysis;
/// use ally_cutover::records::RawTables;
///
/// // No sessions at all: the before partition is empty
/// let result = run_analysis(&RawTables::default(), &AnalysisConfig::default());
/// assert!(result.is_err());
/// ```
pub fn run_analysis(raw: &RawTables, config: &AnalysisConfig) -> Result<AnalysisReport> {
    config.validate()?;
    let cutover = config.cutover_instant()?;

    let tables = normalize(raw)?;
    let filtered = filter_events(&tables.sessions, &tables.events);
    let durations = compute_durations(&filtered.events);
    let partitions = split_at_cutover(&durations.rows, cutover);

    let before = remove_outliers(Period::Before, &partitions.before, config.iqr_multiplier)?;
    let after = remove_outliers(Period::After, &partitions.after, config.iqr_multiplier)?;

    let decision = decide(&before.durations(), &after.durations(), config)?;

    let audit = CleaningAudit {
        filter: filtered.audit,
        durations: durations.audit,
        before_rows: partitions.before.len(),
        after_rows: partitions.after.len(),
        outliers_before: before.removed,
        outliers_after: after.removed,
    };

    Ok(AnalysisReport {
        cutover,
        config: config.clone(),
        audit,
        before,
        after,
        decision,
    })
}
