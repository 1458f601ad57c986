//! Job arrivals.

use prodline_core::{BoundedCounter, Component, Key, Scheduler, SimError};
use tracing::trace;

use crate::job_queue::JobQueue;
use crate::machine::MachineEvent;
use crate::{SharedStats, SharedVariates};

#[derive(Debug, Clone, PartialEq)]
pub enum ArrivalEvent {
    Start,
    Arrive,
}

/// Waits an inter-arrival delay, enqueues a job, signals the counter, repeats.
///
/// This is the only writer that appends to the job queue.
pub struct ArrivalProcess {
    variates: SharedVariates,
    queue: JobQueue,
    counter: BoundedCounter<MachineEvent>,
    stats: SharedStats,
}

impl ArrivalProcess {
    pub fn new(
        variates: SharedVariates,
        queue: JobQueue,
        counter: BoundedCounter<MachineEvent>,
        stats: SharedStats,
    ) -> Self {
        Self {
            variates,
            queue,
            counter,
            stats,
        }
    }

    fn schedule_next(&mut self, self_id: Key<ArrivalEvent>, scheduler: &mut Scheduler) {
        let delay = self.variates.borrow_mut().inter_arrival();
        scheduler.schedule(delay, self_id, ArrivalEvent::Arrive);
    }
}

impl Component for ArrivalProcess {
    type Event = ArrivalEvent;

    fn process_event(
        &mut self,
        self_id: Key<Self::Event>,
        event: &Self::Event,
        scheduler: &mut Scheduler,
    ) -> Result<(), SimError> {
        if *event == ArrivalEvent::Arrive {
            let now = scheduler.time();
            self.queue.push(now);
            self.stats.borrow_mut().record_arrival();
            trace!(time = %now, waiting = self.queue.len(), "Job arrived");
            self.counter.put(1, scheduler)?;
        }
        self.schedule_next(self_id, scheduler);
        Ok(())
    }
}
