//! File export of run results
//!
//! JSON carries the summary and the per-job records; CSV writes one file of
//! job records and one of queue-level changes for spreadsheet or pandas use.

pub mod csv;
pub mod json;

use crate::accumulator::StatisticsAccumulator;
use crate::error::MetricsError;
use crate::summary::RunSummary;
use std::path::Path;

/// Trait for writing run results to some destination
pub trait MetricsExporter {
    fn export(&self, summary: &RunSummary, stats: &StatisticsAccumulator) -> Result<(), MetricsError>;
}

/// Export a run to a JSON file
///
/// # Example
/// ```no_run
/// use prodline_core::SimTime;
/// use prodline_metrics::{RunSummary, StatisticsAccumulator};
/// use prodline_metrics::export::export_json;
///
/// let mut stats = StatisticsAccumulator::new();
/// stats.close(SimTime::from(10.0));
/// let summary = RunSummary::from_stats(&stats, 10.0, 42);
/// export_json(&summary, &stats, "results/run.json", true).unwrap();
/// ```
pub fn export_json(
    summary: &RunSummary,
    stats: &StatisticsAccumulator,
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), MetricsError> {
    json::JsonExporter::new(path.as_ref(), pretty).export(summary, stats)
}

/// Export a run to `{stem}_jobs.csv` and `{stem}_queue.csv` next to `path`
pub fn export_csv(
    summary: &RunSummary,
    stats: &StatisticsAccumulator,
    path: impl AsRef<Path>,
) -> Result<(), MetricsError> {
    csv::CsvExporter::new(path.as_ref()).export(summary, stats)
}
