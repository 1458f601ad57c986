//! Run-time statistics for the production line.
//!
//! Processes append measurements as they happen; nothing is read back until
//! the run ends. The only mutation of an existing entry is repair time billed
//! to the job currently on the machine.
//!
//! Every recording call also goes out through the `metrics` facade, which is
//! a no-op unless the caller installed a recorder.

use prodline_core::{SimError, SimTime};
use serde::Serialize;
use tracing::trace;

use crate::level::LevelTracker;
use crate::series::Series;

/// Wait accounting for one job taken by the machine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRecord {
    pub arrived_at: f64,
    pub started_at: f64,
    /// Time spent in the queue before the machine took the job.
    pub queue_wait: f64,
    /// Repair time billed to this job while it was on the machine.
    pub repair_billed: f64,
    pub interruptions: u32,
}

impl JobRecord {
    /// Queue delay plus billed repairs.
    pub fn wait(&self) -> f64 {
        self.queue_wait + self.repair_billed
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatisticsAccumulator {
    free_time: Series,
    prep_time: Series,
    working_time: Series,
    repair_time: Series,
    jobs: Vec<JobRecord>,
    queue: LevelTracker,
    parts_arrived: u64,
    parts_completed: u64,
    interruptions: u64,
    breakdowns_dropped: u64,
}

impl StatisticsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_arrival(&mut self) {
        self.parts_arrived += 1;
        metrics::counter!("prodline_parts_arrived_total").increment(1);
    }

    /// The number of waiting jobs changed to `level` at `now`.
    pub fn record_queue_level(&mut self, level: usize, now: SimTime) {
        self.queue.set(level as u64, now);
        metrics::gauge!("prodline_queue_size").set(level as f64);
    }

    /// The machine took the job that arrived at `arrived_at`.
    pub fn record_job_start(&mut self, arrived_at: SimTime, now: SimTime) {
        let queue_wait = now.elapsed_since(arrived_at);
        trace!(arrived_at = %arrived_at, now = %now, queue_wait, "Job taken");
        self.jobs.push(JobRecord {
            arrived_at: arrived_at.as_f64(),
            started_at: now.as_f64(),
            queue_wait,
            repair_billed: 0.0,
            interruptions: 0,
        });
        metrics::histogram!("prodline_queue_wait").record(queue_wait);
    }

    pub fn record_free_time(&mut self, duration: f64) {
        self.free_time.push(duration);
        metrics::histogram!("prodline_free_time").record(duration);
    }

    pub fn record_prep_time(&mut self, duration: f64) {
        self.prep_time.push(duration);
        metrics::histogram!("prodline_prep_time").record(duration);
    }

    pub fn record_working_time(&mut self, duration: f64) {
        self.working_time.push(duration);
        metrics::histogram!("prodline_working_time").record(duration);
    }

    /// Adds a completed repair to the repair series and to the wait of the
    /// job currently on the machine.
    pub fn bill_repair(&mut self, duration: f64) -> Result<(), SimError> {
        let job = self
            .jobs
            .last_mut()
            .ok_or_else(|| SimError::invariant("repair billed with no job on the machine"))?;
        job.repair_billed += duration;
        self.repair_time.push(duration);
        metrics::histogram!("prodline_repair_time").record(duration);
        Ok(())
    }

    /// A breakdown interrupted the job currently being processed.
    pub fn record_interruption(&mut self) -> Result<(), SimError> {
        let job = self
            .jobs
            .last_mut()
            .ok_or_else(|| SimError::invariant("interruption with no job on the machine"))?;
        job.interruptions += 1;
        self.interruptions += 1;
        metrics::counter!("prodline_interruptions_total").increment(1);
        Ok(())
    }

    /// A breakdown fired while the machine was not processing.
    pub fn record_dropped_breakdown(&mut self) {
        self.breakdowns_dropped += 1;
        metrics::counter!("prodline_breakdowns_dropped_total").increment(1);
    }

    pub fn record_completion(&mut self) {
        self.parts_completed += 1;
        metrics::counter!("prodline_parts_completed_total").increment(1);
    }

    /// Closes the time-weighted series at the horizon.
    pub fn close(&mut self, horizon: SimTime) {
        self.queue.close(horizon);
    }

    pub fn free_time(&self) -> &Series {
        &self.free_time
    }

    pub fn prep_time(&self) -> &Series {
        &self.prep_time
    }

    pub fn working_time(&self) -> &Series {
        &self.working_time
    }

    pub fn repair_time(&self) -> &Series {
        &self.repair_time
    }

    pub fn jobs(&self) -> &[JobRecord] {
        &self.jobs
    }

    /// Per-job waits, queue delay plus billed repairs.
    pub fn wait_times(&self) -> Series {
        self.jobs.iter().map(JobRecord::wait).collect()
    }

    pub fn queue(&self) -> &LevelTracker {
        &self.queue
    }

    pub fn parts_arrived(&self) -> u64 {
        self.parts_arrived
    }

    pub fn parts_completed(&self) -> u64 {
        self.parts_completed
    }

    pub fn interruptions(&self) -> u64 {
        self.interruptions
    }

    pub fn breakdowns_dropped(&self) -> u64 {
        self.breakdowns_dropped
    }
}
