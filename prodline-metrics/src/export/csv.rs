//! CSV export of a run

use crate::accumulator::StatisticsAccumulator;
use crate::error::MetricsError;
use crate::export::MetricsExporter;
use crate::summary::RunSummary;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// CSV exporter
///
/// Creates two files next to the configured path:
/// - `{stem}_jobs.csv` - one row per job taken by the machine
/// - `{stem}_queue.csv` - one row per change of the queue size
#[derive(Debug)]
pub struct CsvExporter {
    path: PathBuf,
}

impl CsvExporter {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Get the path for a specific CSV file
    pub fn path_for(&self, suffix: &str) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("run");
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        parent.join(format!("{stem}_{suffix}.csv"))
    }

    fn create(&self, suffix: &str) -> Result<BufWriter<File>, MetricsError> {
        let path = self.path_for(suffix);
        let file = File::create(&path)
            .map_err(|e| MetricsError::Export(format!("Failed to create {}: {e}", path.display())))?;
        Ok(BufWriter::new(file))
    }

    fn export_jobs(&self, stats: &StatisticsAccumulator) -> Result<(), MetricsError> {
        let mut out = self.create("jobs")?;
        writeln!(out, "job,arrived_at,started_at,queue_wait,repair_billed,wait,interruptions")?;
        for (i, job) in stats.jobs().iter().enumerate() {
            writeln!(
                out,
                "{},{},{},{},{},{},{}",
                i + 1,
                job.arrived_at,
                job.started_at,
                job.queue_wait,
                job.repair_billed,
                job.wait(),
                job.interruptions
            )?;
        }
        out.flush()?;
        Ok(())
    }

    fn export_queue(&self, summary: &RunSummary, stats: &StatisticsAccumulator) -> Result<(), MetricsError> {
        let mut out = self.create("queue")?;
        writeln!(out, "time,queue_size")?;
        for point in stats.queue().history() {
            writeln!(out, "{},{}", point.time, point.level)?;
        }
        // Final level held until the horizon.
        writeln!(out, "{},{}", summary.horizon, stats.queue().level())?;
        out.flush()?;
        Ok(())
    }
}

impl MetricsExporter for CsvExporter {
    fn export(&self, summary: &RunSummary, stats: &StatisticsAccumulator) -> Result<(), MetricsError> {
        self.export_jobs(stats)?;
        self.export_queue(summary, stats)?;
        Ok(())
    }
}
