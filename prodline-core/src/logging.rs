//! Structured logging for simulation runs
//!
//! Everything logs through `tracing`. Binaries pick one of the initializers
//! below; libraries and tests never install a subscriber themselves.
//!
//! # Controlling output
//!
//! The `RUST_LOG` environment variable overrides the level passed in code:
//!
//! ```bash
//! RUST_LOG=debug prodline --horizon 100
//! RUST_LOG=prodline_model::machine=trace prodline
//! ```
//!
//! # Level guidelines
//! - **TRACE**: every scheduled, cancelled and dispatched event
//! - **DEBUG**: process state changes (job taken, breakdown, repair)
//! - **INFO**: run start and completion
//! - **WARN**: dropped events and other unusual conditions

use tracing::{debug, info, Span};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::SimTime;

/// Initialize logging at `info`.
pub fn init_simulation_logging() {
    init_simulation_logging_with_level("info")
}

fn default_directives(level: &str) -> String {
    ["prodline", "prodline_core", "prodline_model", "prodline_metrics"]
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize logging with a specific level
///
/// # Arguments
/// * `level` - Log level: "trace", "debug", "info", "warn", or "error"
///
/// # Example
/// ```rust,no_run
/// use prodline_core::logging::init_simulation_logging_with_level;
///
/// init_simulation_logging_with_level("debug");
/// ```
pub fn init_simulation_logging_with_level(level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directives(level).into());

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .init();

    info!("Simulation logging initialized at level: {}", level);
}

/// Trace everything, pretty-printed.
pub fn init_detailed_simulation_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "trace,prodline_core=trace,prodline_model=trace,prodline_metrics=debug".into());

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_file(true)
                .with_line_number(true)
                .pretty(),
        )
        .with(filter)
        .init();

    info!("Detailed simulation logging initialized");
}

/// Create a span for tracking simulation execution
pub fn simulation_span(name: &str) -> Span {
    tracing::info_span!("simulation", name = name)
}

/// Create a span for tracking component execution
pub fn component_span(component_name: &str, component_id: &str) -> Span {
    tracing::debug_span!("component", name = component_name, id = component_id)
}

/// Logging helpers for run-level milestones.
pub mod events {
    use super::*;

    /// Log simulation start
    pub fn simulation_started(name: &str, end_time: SimTime, seed: u64) {
        info!(simulation = name, end_time = %end_time, seed, "Simulation started");
    }

    /// Log simulation completion
    pub fn simulation_completed(name: &str, final_time: SimTime, events_processed: u64) {
        info!(
            simulation = name,
            final_time = %final_time,
            events_processed,
            "Simulation completed"
        );
    }

    /// Log component state change
    pub fn component_state_changed(component: &str, old_state: &str, new_state: &str, time: SimTime) {
        debug!(
            component = component,
            old_state = old_state,
            new_state = new_state,
            time = %time,
            "Component state changed"
        );
    }
}
