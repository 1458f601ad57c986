//! The machine: take a job, prepare, process, survive breakdowns.
//!
//! Each suspension point of the machine's loop is an event it schedules to
//! itself; the fields below hold what it needs to resume. The pending
//! processing timeout is kept by id so an interruption can withdraw it.
//!
//! ```text
//! Idle --job--> AwaitingPrep --> Preparing --> Processing --done--> Idle
//!                                                |    ^
//!                                       interrupt|    |3 repairs
//!                                                v    |
//!                                               Repairing
//! ```

use std::cell::Cell;
use std::rc::Rc;

use prodline_core::logging::{component_span, events};
use prodline_core::{
    Acquire, BoundedCounter, Component, EventId, Key, Scheduler, SimError, SimTime,
};
use tracing::{debug, trace};

use crate::job_queue::JobQueue;
use crate::{SharedStats, SharedVariates};

/// Repair cycles run after every interruption, however much work remains.
pub const REPAIR_CYCLES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineState {
    Idle,
    AwaitingPrep,
    Preparing,
    Processing,
    Repairing,
}

impl MachineState {
    fn name(self) -> &'static str {
        match self {
            MachineState::Idle => "idle",
            MachineState::AwaitingPrep => "awaiting_prep",
            MachineState::Preparing => "preparing",
            MachineState::Processing => "processing",
            MachineState::Repairing => "repairing",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MachineEvent {
    Start,
    /// The counter granted a job to a suspended `get`.
    JobAvailable,
    PrepDone,
    ProcessingDone,
    /// A breakdown landed while the machine looked busy.
    Interrupt,
    RepairDone,
}

/// Read-only view of whether the machine is processing right now.
#[derive(Debug, Clone)]
pub struct BusyFlag {
    flag: Rc<Cell<bool>>,
}

impl BusyFlag {
    pub fn is_busy(&self) -> bool {
        self.flag.get()
    }
}

pub struct MachineProcess {
    state: MachineState,
    variates: SharedVariates,
    queue: JobQueue,
    counter: BoundedCounter<MachineEvent>,
    stats: SharedStats,
    busy: Rc<Cell<bool>>,
    last_part_end: SimTime,
    prep_draw: f64,
    remaining: f64,
    segment_start: SimTime,
    pending_completion: Option<EventId>,
    repairs_left: u32,
    repair_draw: f64,
    parts_completed: u64,
}

impl MachineProcess {
    pub fn new(
        variates: SharedVariates,
        queue: JobQueue,
        counter: BoundedCounter<MachineEvent>,
        stats: SharedStats,
    ) -> Self {
        Self {
            state: MachineState::Idle,
            variates,
            queue,
            counter,
            stats,
            busy: Rc::new(Cell::new(false)),
            last_part_end: SimTime::zero(),
            prep_draw: 0.0,
            remaining: 0.0,
            segment_start: SimTime::zero(),
            pending_completion: None,
            repairs_left: 0,
            repair_draw: 0.0,
            parts_completed: 0,
        }
    }

    pub fn busy_flag(&self) -> BusyFlag {
        BusyFlag {
            flag: Rc::clone(&self.busy),
        }
    }

    pub fn state(&self) -> MachineState {
        self.state
    }

    pub fn parts_completed(&self) -> u64 {
        self.parts_completed
    }

    /// Processing time still owed to the current part.
    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    fn set_state(&mut self, next: MachineState, now: SimTime) {
        if self.state != next {
            events::component_state_changed("machine", self.state.name(), next.name(), now);
        }
        self.state = next;
        self.busy.set(next == MachineState::Processing);
    }

    fn expect_state(&self, expected: MachineState, event: &MachineEvent) -> Result<(), SimError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SimError::invariant(format!(
                "machine received {event:?} while {:?}, expected {expected:?}",
                self.state
            )))
        }
    }

    fn request_job(&mut self, self_id: Key<MachineEvent>, scheduler: &mut Scheduler) -> Result<(), SimError> {
        self.set_state(MachineState::Idle, scheduler.time());
        match self.counter.get(1, self_id, MachineEvent::JobAvailable, scheduler)? {
            Acquire::Ready => self.take_job(self_id, scheduler),
            Acquire::Pending => Ok(()),
        }
    }

    fn take_job(&mut self, self_id: Key<MachineEvent>, scheduler: &mut Scheduler) -> Result<(), SimError> {
        let now = scheduler.time();
        let arrived_at = self.queue.pop_front(now)?;
        {
            let mut stats = self.stats.borrow_mut();
            stats.record_job_start(arrived_at, now);
            stats.record_free_time(now.elapsed_since(self.last_part_end));
        }
        self.set_state(MachineState::AwaitingPrep, now);

        self.prep_draw = self.variates.borrow_mut().preparation();
        self.set_state(MachineState::Preparing, now);
        scheduler.schedule(self.prep_draw, self_id, MachineEvent::PrepDone);
        Ok(())
    }

    fn prep_done(&mut self, self_id: Key<MachineEvent>, scheduler: &mut Scheduler) -> Result<(), SimError> {
        let processing = self.variates.borrow_mut().processing();
        {
            let mut stats = self.stats.borrow_mut();
            stats.record_prep_time(self.prep_draw);
            stats.record_working_time(processing);
        }
        self.remaining = processing;
        self.continue_processing(self_id, scheduler)
    }

    /// Runs another processing segment, or finishes the part if no work is left.
    fn continue_processing(&mut self, self_id: Key<MachineEvent>, scheduler: &mut Scheduler) -> Result<(), SimError> {
        if self.remaining <= 0.0 {
            return self.finish_part(self_id, scheduler);
        }
        let now = scheduler.time();
        self.set_state(MachineState::Processing, now);
        self.segment_start = now;
        let id = scheduler.schedule(self.remaining, self_id, MachineEvent::ProcessingDone);
        self.pending_completion = Some(id);
        trace!(remaining = self.remaining, time = %now, "Processing segment started");
        Ok(())
    }

    fn interrupt(&mut self, self_id: Key<MachineEvent>, scheduler: &mut Scheduler) -> Result<(), SimError> {
        let now = scheduler.time();
        if self.state != MachineState::Processing {
            debug!(state = ?self.state, time = %now, "Interrupt arrived after processing stopped, dropped");
            self.stats.borrow_mut().record_dropped_breakdown();
            return Ok(());
        }
        if let Some(id) = self.pending_completion.take() {
            scheduler.cancel(id);
        }
        self.remaining = (self.remaining - now.elapsed_since(self.segment_start)).max(0.0);
        self.set_state(MachineState::Repairing, now);
        self.stats.borrow_mut().record_interruption()?;
        debug!(remaining = self.remaining, time = %now, "Machine broke down");

        self.repairs_left = REPAIR_CYCLES;
        self.start_repair(self_id, scheduler);
        Ok(())
    }

    fn start_repair(&mut self, self_id: Key<MachineEvent>, scheduler: &mut Scheduler) {
        self.repair_draw = self.variates.borrow_mut().repair();
        self.repairs_left -= 1;
        scheduler.schedule(self.repair_draw, self_id, MachineEvent::RepairDone);
    }

    fn repair_done(&mut self, self_id: Key<MachineEvent>, scheduler: &mut Scheduler) -> Result<(), SimError> {
        self.stats.borrow_mut().bill_repair(self.repair_draw)?;
        if self.repairs_left > 0 {
            self.start_repair(self_id, scheduler);
            Ok(())
        } else {
            self.continue_processing(self_id, scheduler)
        }
    }

    fn finish_part(&mut self, self_id: Key<MachineEvent>, scheduler: &mut Scheduler) -> Result<(), SimError> {
        let now = scheduler.time();
        self.remaining = 0.0;
        self.last_part_end = now;
        self.parts_completed += 1;
        self.stats.borrow_mut().record_completion();
        debug!(parts_completed = self.parts_completed, time = %now, "Part completed");
        self.request_job(self_id, scheduler)
    }
}

impl Component for MachineProcess {
    type Event = MachineEvent;

    fn process_event(
        &mut self,
        self_id: Key<Self::Event>,
        event: &Self::Event,
        scheduler: &mut Scheduler,
    ) -> Result<(), SimError> {
        let span = component_span("machine", &self_id.id().to_string());
        let _enter = span.enter();
        match event {
            MachineEvent::Start => {
                self.last_part_end = scheduler.time();
                self.request_job(self_id, scheduler)
            }
            MachineEvent::JobAvailable => {
                self.expect_state(MachineState::Idle, event)?;
                self.take_job(self_id, scheduler)
            }
            MachineEvent::PrepDone => {
                self.expect_state(MachineState::Preparing, event)?;
                self.prep_done(self_id, scheduler)
            }
            MachineEvent::ProcessingDone => {
                self.expect_state(MachineState::Processing, event)?;
                self.pending_completion = None;
                self.finish_part(self_id, scheduler)
            }
            MachineEvent::Interrupt => self.interrupt(self_id, scheduler),
            MachineEvent::RepairDone => {
                self.expect_state(MachineState::Repairing, event)?;
                self.repair_done(self_id, scheduler)
            }
        }
    }
}
