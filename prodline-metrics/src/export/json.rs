//! JSON export of a run

use crate::accumulator::{JobRecord, StatisticsAccumulator};
use crate::error::MetricsError;
use crate::export::MetricsExporter;
use crate::level::LevelPoint;
use crate::summary::RunSummary;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// JSON exporter for a finished run
#[derive(Debug)]
pub struct JsonExporter {
    path: PathBuf,
    pretty: bool,
}

impl JsonExporter {
    /// Create a new JSON exporter
    ///
    /// # Arguments
    /// * `path` - Output file path
    /// * `pretty` - Whether to pretty-print the JSON
    pub fn new(path: &Path, pretty: bool) -> Self {
        Self {
            path: path.to_path_buf(),
            pretty,
        }
    }
}

#[derive(Debug, Serialize)]
struct ExportData<'a> {
    summary: &'a RunSummary,
    jobs: &'a [JobRecord],
    queue_levels: &'a [LevelPoint],
}

impl MetricsExporter for JsonExporter {
    fn export(&self, summary: &RunSummary, stats: &StatisticsAccumulator) -> Result<(), MetricsError> {
        let export_data = ExportData {
            summary,
            jobs: stats.jobs(),
            queue_levels: stats.queue().history(),
        };

        let json = if self.pretty {
            serde_json::to_string_pretty(&export_data)
        } else {
            serde_json::to_string(&export_data)
        }
        .map_err(|e| MetricsError::Export(format!("JSON serialization failed: {e}")))?;

        let mut file = File::create(&self.path)
            .map_err(|e| MetricsError::Export(format!("Failed to create {}: {e}", self.path.display())))?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
