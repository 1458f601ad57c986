//! # prodline - single-machine production line simulator
//!
//! A deterministic discrete event simulation of one machine fed by random
//! arrivals and interrupted by random breakdowns.
//!
//! - [`core`]: clock, scheduler, executor, counter, seeded distributions
//! - [`metrics`]: statistics accumulation, summaries, reporters, export
//! - [`model`]: the arrival, machine and breakdown processes
//!
//! ```rust
//! use prodline::prelude::*;
//!
//! let run = ProductionLine::new(LineConfig::default())?.run(100.0)?;
//! let text = TextReporter.render(&run.summary).unwrap();
//! assert!(text.contains("Parts made:"));
//! # Ok::<(), SimError>(())
//! ```

pub use prodline_core as core;

pub use prodline_metrics as metrics;

pub use prodline_model as model;

pub mod cli;

// Convenience re-exports of commonly used items
pub mod prelude {
    //! Commonly used types and traits

    pub use prodline_core::{
        Component, DistributionSpec, Execute, Executor, Key, SimError, SimTime, Simulation,
        TimeDistribution,
    };

    pub use prodline_metrics::{
        JsonReporter, Reporter, RunSummary, StatisticsAccumulator, TextReporter,
    };

    pub use prodline_model::{
        LineConfig, LineRun, MachineState, ProductionLine, RandomVariateSource,
    };
}
