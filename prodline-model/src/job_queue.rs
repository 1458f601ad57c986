//! FIFO of waiting jobs.
//!
//! Only arrival timestamps are stored. Every push and pop reports the new
//! length to the statistics so the queue-size series sees each change.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use prodline_core::{SimError, SimTime};

use crate::SharedStats;

/// Shared handle; clones refer to the same queue.
#[derive(Clone)]
pub struct JobQueue {
    waiting: Rc<RefCell<VecDeque<SimTime>>>,
    stats: SharedStats,
}

impl std::fmt::Debug for JobQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobQueue").field("len", &self.len()).finish()
    }
}

impl JobQueue {
    pub fn new(stats: SharedStats) -> Self {
        Self {
            waiting: Rc::new(RefCell::new(VecDeque::new())),
            stats,
        }
    }

    pub fn len(&self) -> usize {
        self.waiting.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiting.borrow().is_empty()
    }

    /// Appends a job that arrived at `now`.
    pub fn push(&self, now: SimTime) {
        let len = {
            let mut waiting = self.waiting.borrow_mut();
            waiting.push_back(now);
            waiting.len()
        };
        self.stats.borrow_mut().record_queue_level(len, now);
    }

    /// Removes the oldest job and returns its arrival time.
    ///
    /// An empty queue here means the counter and the queue disagree.
    pub fn pop_front(&self, now: SimTime) -> Result<SimTime, SimError> {
        let (arrived_at, len) = {
            let mut waiting = self.waiting.borrow_mut();
            let arrived_at = waiting.pop_front().ok_or_else(|| {
                SimError::invariant(format!("job queue empty when a job was signalled at {now}"))
            })?;
            (arrived_at, waiting.len())
        };
        self.stats.borrow_mut().record_queue_level(len, now);
        Ok(arrived_at)
    }
}
