//! Single-machine production line model
//!
//! Three processes share one virtual clock:
//!
//! - [`ArrivalProcess`] enqueues jobs at exponential intervals and signals a
//!   [`BoundedCounter`](prodline_core::BoundedCounter).
//! - [`MachineProcess`] takes jobs off the counter, prepares, processes, and
//!   repairs itself three times after each interruption.
//! - [`BreakdownProcess`] interrupts the machine at normal intervals, but only
//!   while it is processing.
//!
//! Everything they measure goes into one
//! [`StatisticsAccumulator`](prodline_metrics::StatisticsAccumulator).
//!
//! ```rust
//! use prodline_model::{LineConfig, ProductionLine};
//!
//! let line = ProductionLine::new(LineConfig::default().with_seed(7)).unwrap();
//! let run = line.run(50.0).unwrap();
//! assert!(run.summary.parts_completed <= run.summary.parts_arrived);
//! ```

pub mod arrival;
pub mod breakdown;
pub mod config;
pub mod job_queue;
pub mod line;
pub mod machine;
pub mod variates;

use std::cell::RefCell;
use std::rc::Rc;

use prodline_metrics::StatisticsAccumulator;

pub use arrival::{ArrivalEvent, ArrivalProcess};
pub use breakdown::{BreakdownEvent, BreakdownProcess};
pub use config::LineConfig;
pub use job_queue::JobQueue;
pub use line::{LineRun, ProductionLine};
pub use machine::{BusyFlag, MachineEvent, MachineProcess, MachineState, REPAIR_CYCLES};
pub use variates::RandomVariateSource;

/// Statistics shared by the processes of one run.
pub type SharedStats = Rc<RefCell<StatisticsAccumulator>>;

/// Draw source shared by the processes of one run.
pub type SharedVariates = Rc<RefCell<RandomVariateSource>>;
