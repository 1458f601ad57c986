//! Final numbers of one run.

use serde::{Deserialize, Serialize};

use crate::accumulator::StatisticsAccumulator;

/// Everything a reporter needs, computed once after the horizon.
///
/// Statistics over a series that may be empty are `None` ("no data").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub horizon: f64,
    pub seed: u64,
    pub total_free_time: f64,
    pub total_prep_time: f64,
    pub total_working_time: f64,
    pub total_repair_time: f64,
    pub parts_arrived: u64,
    pub parts_completed: u64,
    pub interruptions: u64,
    pub breakdowns_dropped: u64,
    pub mean_working_time: Option<f64>,
    pub mean_wait: Option<f64>,
    pub max_wait: Option<f64>,
    pub mean_queue_size: Option<f64>,
    pub max_queue_size: Option<f64>,
    pub mean_empty_queue_duration: Option<f64>,
    /// Total free time over total working time, in percent.
    pub free_working_ratio_pct: Option<f64>,
    /// Completed parts per time unit.
    pub throughput: Option<f64>,
}

impl RunSummary {
    /// Summarizes `stats`, which must already be closed at `horizon`.
    pub fn from_stats(stats: &StatisticsAccumulator, horizon: f64, seed: u64) -> Self {
        let waits = stats.wait_times();
        let queue = stats.queue();
        let total_free_time = stats.free_time().sum();
        let total_working_time = stats.working_time().sum();

        Self {
            horizon,
            seed,
            total_free_time,
            total_prep_time: stats.prep_time().sum(),
            total_working_time,
            total_repair_time: stats.repair_time().sum(),
            parts_arrived: stats.parts_arrived(),
            parts_completed: stats.parts_completed(),
            interruptions: stats.interruptions(),
            breakdowns_dropped: stats.breakdowns_dropped(),
            mean_working_time: stats.working_time().mean(),
            mean_wait: waits.mean(),
            max_wait: waits.max(),
            mean_queue_size: queue.windows().weighted_mean(),
            max_queue_size: queue.windows().max(),
            mean_empty_queue_duration: queue.empty_intervals().mean(),
            free_working_ratio_pct: (total_working_time > 0.0)
                .then(|| total_free_time / total_working_time * 100.0),
            throughput: (horizon > 0.0).then(|| stats.parts_completed() as f64 / horizon),
        }
    }
}
