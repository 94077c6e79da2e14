//! Terminal charts of the cleaned duration distributions
//!
//! `--charts` prints, for each partition, a histogram of `duration_seconds`
//! and a one-line box plot drawn from the five-number summary.

use crate::error::Result;
use crate::pipeline::{AnalysisReport, OutlierFiltered};
use crate::statistics::{five_number_summary, FiveNumberSummary};

const BAR_WIDTH: usize = 40;
const BOX_WIDTH: usize = 60;

/// Equal-width bin counts over `[min, max]`
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub min: f64,
    pub max: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// `bins` is clamped to at least 1; a zero-range sample uses one bin
    pub fn new(values: &[f64], bins: usize) -> Self {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if values.is_empty() {
            return Self {
                min: 0.0,
                max: 0.0,
                counts: Vec::new(),
            };
        }

        let bins = if max > min { bins.max(1) } else { 1 };
        let width = (max - min) / bins as f64;
        let mut counts = vec![0; bins];
        for &v in values {
            let idx = if width > 0.0 {
                (((v - min) / width) as usize).min(bins - 1)
            } else {
                0
            };
            counts[idx] += 1;
        }

        Self { min, max, counts }
    }

    pub fn bin_width(&self) -> f64 {
        if self.counts.is_empty() {
            0.0
        } else {
            (self.max - self.min) / self.counts.len() as f64
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let peak = self.counts.iter().copied().max().unwrap_or(0);
        let width = self.bin_width();

        for (i, &count) in self.counts.iter().enumerate() {
            let start = self.min + width * i as f64;
            let bar = if peak > 0 {
                (count * BAR_WIDTH).div_ceil(peak)
            } else {
                0
            };
            out.push_str(&format!(
                "  {:>10.1} - {:<10.1} │{:<bar_width$} {}\n",
                start,
                start + width,
                "█".repeat(bar),
                count,
                bar_width = BAR_WIDTH
            ));
        }
        out
    }
}

fn scale(value: f64, summary: &FiveNumberSummary) -> usize {
    let range = summary.max - summary.min;
    if range <= 0.0 {
        return BOX_WIDTH / 2;
    }
    (((value - summary.min) / range) * (BOX_WIDTH - 1) as f64).round() as usize
}

/// One-line box plot: whiskers from min to max, box from Q1 to Q3
pub fn box_plot(summary: &FiveNumberSummary) -> String {
    let mut line = vec![' '; BOX_WIDTH];
    let (lo, q1, med, q3, hi) = (
        scale(summary.min, summary),
        scale(summary.q1, summary),
        scale(summary.median, summary),
        scale(summary.q3, summary),
        scale(summary.max, summary),
    );

    for cell in line.iter_mut().take(q1).skip(lo) {
        *cell = '─';
    }
    for cell in line.iter_mut().take(hi + 1).skip(q3) {
        *cell = '─';
    }
    for cell in line.iter_mut().take(q3 + 1).skip(q1) {
        *cell = '▒';
    }
    line[lo] = '├';
    line[hi] = '┤';
    line[q1] = '[';
    line[q3] = ']';
    line[med] = '┃';

    format!(
        "  {}\n  min={:.1} q1={:.1} median={:.1} q3={:.1} max={:.1}\n",
        line.into_iter().collect::<String>(),
        summary.min,
        summary.q1,
        summary.median,
        summary.q3,
        summary.max
    )
}

fn partition_chart(partition: &OutlierFiltered, bins: usize) -> Result<String> {
    let durations = partition.durations();
    let summary = five_number_summary(&durations)?;
    let sep = "\u{2500}".repeat(BOX_WIDTH + 2);

    let mut out = format!(
        "Duration distribution ({}, n={})\n{}\n",
        partition.period,
        durations.len(),
        sep
    );
    out.push_str(&Histogram::new(&durations, bins).render());
    out.push('\n');
    out.push_str(&box_plot(&summary));
    out.push_str(&sep);
    out.push('\n');
    Ok(out)
}

/// Histogram and box plot for both partitions
pub fn render_charts(report: &AnalysisReport, bins: usize) -> Result<String> {
    let mut out = partition_chart(&report.before, bins)?;
    out.push('\n');
    out.push_str(&partition_chart(&report.after, bins)?);
    Ok(out)
}
