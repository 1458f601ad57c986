//! Command line front end: load a configuration, apply overrides, run, report.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use prodline_core::SimError;
use prodline_metrics::{
    export_csv, export_json, with_capture_recorder, JsonReporter, MetricsCapture, MetricsError,
    Reporter, TextReporter,
};
use prodline_model::{LineConfig, ProductionLine};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Single-machine production line simulator
#[derive(Parser, Debug)]
#[command(name = "prodline", about = "Simulate a production line with random arrivals and breakdowns.")]
pub struct Cli {
    /// Path to a JSON line configuration (missing fields keep their defaults)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Simulated horizon in hours (overrides the configuration)
    #[arg(long, allow_negative_numbers = true)]
    pub horizon: Option<f64>,

    /// Random seed (overrides the configuration)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Log level for the `tracing` subscriber; RUST_LOG takes precedence
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Trace every event with pretty-printed output (ignores --log-level)
    #[arg(long)]
    pub detailed_logs: bool,

    /// Also write summary, job records and queue history as JSON
    #[arg(long)]
    pub export_json: Option<PathBuf>,

    /// Also write job records and queue history as CSV files
    #[arg(long)]
    pub export_csv: Option<PathBuf>,

    /// Append the counters emitted during the run to the report
    #[arg(long)]
    pub metrics: bool,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Simulation(#[from] SimError),

    #[error(transparent)]
    Metrics(#[from] MetricsError),
}

impl Cli {
    /// The configuration file, or defaults, with command line overrides applied.
    pub fn line_config(&self) -> Result<LineConfig, SimError> {
        let mut config = match &self.config {
            Some(path) => LineConfig::from_json_file(path)?,
            None => LineConfig::default(),
        };
        if let Some(horizon) = self.horizon {
            config.horizon = horizon;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Runs the line described by `cli` and returns the rendered report.
pub fn run(cli: &Cli) -> Result<String, CliError> {
    let config = cli.line_config()?;
    info!(seed = config.seed, horizon = config.horizon, "Running production line");

    let capture = MetricsCapture::new();
    let line = ProductionLine::new(config)?;
    let run = with_capture_recorder(&capture, || line.run_configured())?;

    if let Some(path) = &cli.export_json {
        export_json(&run.summary, &run.stats, path, true)?;
    }
    if let Some(path) = &cli.export_csv {
        export_csv(&run.summary, &run.stats, path)?;
    }

    let mut report = match cli.format {
        OutputFormat::Text => TextReporter.render(&run.summary)?,
        OutputFormat::Json => JsonReporter::pretty().render(&run.summary)?,
    };
    if cli.metrics {
        for (name, value) in capture.counters() {
            report.push_str(&format!("\n{name} {value}"));
        }
    }
    Ok(report)
}
