//! Random equipment failures.

use prodline_core::{Component, Key, Scheduler, SimError};
use tracing::debug;

use crate::machine::{BusyFlag, MachineEvent};
use crate::{SharedStats, SharedVariates};

#[derive(Debug, Clone, PartialEq)]
pub enum BreakdownEvent {
    Start,
    Fire,
}

/// Fires after each inter-breakdown delay. Only a processing machine is
/// interrupted; a breakdown landing on an idle, preparing or repairing
/// machine is dropped, never deferred.
///
/// The interrupt is delivered ahead of anything else due at the same
/// instant, so a completion falling exactly on the breakdown still takes
/// the interruption.
pub struct BreakdownProcess {
    variates: SharedVariates,
    machine: Key<MachineEvent>,
    busy: BusyFlag,
    stats: SharedStats,
}

impl BreakdownProcess {
    pub fn new(
        variates: SharedVariates,
        machine: Key<MachineEvent>,
        busy: BusyFlag,
        stats: SharedStats,
    ) -> Self {
        Self {
            variates,
            machine,
            busy,
            stats,
        }
    }
}

impl Component for BreakdownProcess {
    type Event = BreakdownEvent;

    fn process_event(
        &mut self,
        self_id: Key<Self::Event>,
        event: &Self::Event,
        scheduler: &mut Scheduler,
    ) -> Result<(), SimError> {
        if *event == BreakdownEvent::Fire {
            if self.busy.is_busy() {
                debug!(time = %scheduler.time(), "Breakdown interrupts the machine");
                scheduler.schedule_urgent(self.machine, MachineEvent::Interrupt);
            } else {
                debug!(time = %scheduler.time(), "Breakdown dropped, machine not processing");
                self.stats.borrow_mut().record_dropped_breakdown();
            }
        }
        let delay = self.variates.borrow_mut().inter_breakdown();
        scheduler.schedule(delay, self_id, BreakdownEvent::Fire);
        Ok(())
    }
}
