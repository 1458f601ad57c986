//! Statistics and reporting for production line runs
//!
//! Processes append raw measurements to a [`StatisticsAccumulator`] while the
//! simulation runs. Once the horizon is reached the accumulator is closed and
//! condensed into a [`RunSummary`], which a [`Reporter`] renders or the
//! [`export`] module writes to disk.

pub mod accumulator;
pub mod error;
pub mod export;
pub mod level;
pub mod recorder;
pub mod report;
pub mod series;
pub mod summary;

pub use accumulator::{JobRecord, StatisticsAccumulator};
pub use error::MetricsError;
pub use export::{export_csv, export_json, MetricsExporter};
pub use level::{LevelPoint, LevelTracker};
pub use recorder::{with_capture_recorder, MetricsCapture};
pub use report::{JsonReporter, Reporter, TextReporter};
pub use series::{Series, WeightedSeries};
pub use summary::RunSummary;
