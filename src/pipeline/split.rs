//! Splitter: before/after partitions around the cutover instant

use crate::records::{Period, SessionDuration};
use chrono::NaiveDateTime;

/// Duration rows on each side of the cutover
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partitions {
    /// `end_time < cutover`
    pub before: Vec<SessionDuration>,
    /// `end_time >= cutover`
    pub after: Vec<SessionDuration>,
}

impl Partitions {
    pub fn get(&self, period: Period) -> &[SessionDuration] {
        match period {
            Period::Before => &self.before,
            Period::After => &self.after,
        }
    }

    pub fn len(&self) -> usize {
        self.before.len() + self.after.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Which side of `cutover` a row falls on
pub fn period_of(row: &SessionDuration, cutover: NaiveDateTime) -> Period {
    if row.end_time < cutover {
        Period::Before
    } else {
        Period::After
    }
}

/// Partition rows by underwriting end time, preserving input order
pub fn split_at_cutover(rows: &[SessionDuration], cutover: NaiveDateTime) -> Partitions {
    let (before, after): (Vec<_>, Vec<_>) = rows
        .iter()
        .cloned()
        .partition(|row| period_of(row, cutover) == Period::Before);

    tracing::debug!(
        %cutover,
        before = before.len(),
        after = after.len(),
        "Split durations at cutover"
    );

    Partitions { before, after }
}
