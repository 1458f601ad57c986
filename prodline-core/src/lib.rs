//! Core discrete event simulation engine.
//!
//! This crate provides the building blocks the production line model runs on:
//! a virtual clock, a time-ordered event scheduler, component registration,
//! a counter-style synchronization primitive, and seeded distributions.
//!
//! # Architecture Overview
//!
//! - [`Simulation`]: owns the scheduler and components. Use this to add
//!   components, schedule their first events, and run to a horizon.
//! - [`Component`]: a logical process. Its fields hold the state it needs to
//!   resume, and each dispatched event advances it by one step.
//! - [`Scheduler`]: the min-priority queue of pending entries. Entries at the
//!   same instant are dispatched in the order they were scheduled.
//!
//! # Basic Usage
//!
//! ```rust
//! use prodline_core::{Component, Execute, Executor, Key, Scheduler, SimError, SimTime, Simulation};
//!
//! #[derive(Debug)]
//! struct Tick;
//!
//! struct Ticker {
//!     ticks: usize,
//! }
//!
//! impl Component for Ticker {
//!     type Event = Tick;
//!
//!     fn process_event(
//!         &mut self,
//!         self_id: Key<Tick>,
//!         _event: &Tick,
//!         scheduler: &mut Scheduler,
//!     ) -> Result<(), SimError> {
//!         self.ticks += 1;
//!         scheduler.schedule(1.0, self_id, Tick);
//!         Ok(())
//!     }
//! }
//!
//! let mut simulation = Simulation::default();
//! let key = simulation.add_component(Ticker { ticks: 0 });
//! simulation.schedule(0.0, key, Tick);
//! simulation.execute(Executor::timed(SimTime::from(3.5))).unwrap();
//!
//! let ticker: Ticker = simulation.remove_component(key).unwrap();
//! assert_eq!(ticker.ticks, 4);
//! ```
//!
//! # Time Model
//!
//! All timing uses [`SimTime`], a real-valued virtual clock (not wall-clock
//! time). Runs are reproducible given the same seed.

pub mod dists;
pub mod error;
pub mod execute;
pub mod ids;
pub mod logging;
pub mod randomness;
pub mod scheduler;
pub mod sync;
pub mod time;
pub mod types;

use std::any::Any;
use std::collections::HashMap;
use tracing::{debug, info, instrument, trace, warn};

pub use dists::{
    Constant, DistributionSpec, Exponential, Normal, Scripted, TimeDistribution, Uniform,
};
pub use error::SimError;
pub use execute::{Execute, Executor};
pub use logging::{
    component_span, init_detailed_simulation_logging, init_simulation_logging,
    init_simulation_logging_with_level, simulation_span,
};
pub use randomness::{DrawSite, RandomStreams};
pub use scheduler::{ClockRef, EventEntry, Priority, Scheduler};
pub use sync::{Acquire, BoundedCounter};
pub use time::SimTime;
pub use types::EventId;

use ids::{deterministic_uuid, UUID_DOMAIN_COMPONENT};
use uuid::Uuid;

#[derive(Debug)]
pub struct Key<T> {
    id: Uuid,
    _marker: std::marker::PhantomData<T>,
}

impl<T> Key<T> {
    pub fn new_with_id(id: Uuid) -> Self {
        Self {
            id,
            _marker: std::marker::PhantomData,
        }
    }

    /// Get the UUID of this key
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl<T> Clone for Key<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Key<T> {}

impl<T> PartialEq for Key<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl<T> Eq for Key<T> {}

pub trait ProcessEventEntry: Any {
    fn process_event_entry(
        &mut self,
        entry: EventEntry,
        scheduler: &mut Scheduler,
    ) -> Result<(), SimError>;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A logical process driven by the scheduler.
///
/// Suspension is expressed by scheduling a future event to `self_id` and
/// returning; everything needed to resume lives in the component's fields.
pub trait Component: ProcessEventEntry {
    type Event: 'static;

    fn process_event(
        &mut self,
        self_id: Key<Self::Event>,
        event: &Self::Event,
        scheduler: &mut Scheduler,
    ) -> Result<(), SimError>;
}

impl<E, C> ProcessEventEntry for C
where
    E: std::fmt::Debug + 'static,
    C: Component<Event = E> + 'static,
{
    fn process_event_entry(
        &mut self,
        entry: EventEntry,
        scheduler: &mut Scheduler,
    ) -> Result<(), SimError> {
        let typed_entry = entry.downcast::<E>().ok_or_else(|| {
            SimError::invariant(format!(
                "event {} does not carry a {}",
                entry.id(),
                std::any::type_name::<E>()
            ))
        })?;
        self.process_event(typed_entry.component_key, typed_entry.event, scheduler)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Container holding type-erased components.
#[derive(Default)]
pub struct Components {
    seed: u64,
    registered: u64,
    components: HashMap<Uuid, Box<dyn ProcessEventEntry>>,
}

impl Components {
    fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Process the event on the component given by the event entry.
    pub fn process_event_entry(
        &mut self,
        entry: EventEntry,
        scheduler: &mut Scheduler,
    ) -> Result<(), SimError> {
        match self.components.get_mut(&entry.component) {
            Some(component) => component.process_event_entry(entry, scheduler),
            None => {
                warn!(component_id = %entry.component, event_id = %entry.id(), "Event for unknown component dropped");
                Ok(())
            }
        }
    }

    /// Registers a new component and returns its ID.
    #[must_use]
    pub fn register<E: std::fmt::Debug + 'static, C: Component<Event = E> + 'static>(
        &mut self,
        component: C,
    ) -> Key<E> {
        self.registered += 1;
        let id = deterministic_uuid(self.seed, UUID_DOMAIN_COMPONENT, self.registered);
        self.components.insert(id, Box::new(component));
        Key::new_with_id(id)
    }

    pub fn remove<E: 'static, C: Component<Event = E> + 'static>(
        &mut self,
        key: Key<E>,
    ) -> Option<C> {
        self.components.remove(&key.id).and_then(|boxed_trait| {
            let boxed_any: Box<dyn Any> = boxed_trait;
            boxed_any.downcast::<C>().ok().map(|boxed_c| *boxed_c)
        })
    }

    /// Get mutable access to a component
    pub fn get_component_mut<E: 'static, C: Component<Event = E> + 'static>(
        &mut self,
        key: Key<E>,
    ) -> Option<&mut C> {
        self.components
            .get_mut(&key.id)
            .and_then(|boxed_trait| boxed_trait.as_any_mut().downcast_mut::<C>())
    }
}

/// Simulation struct that puts different parts of the simulation together.
///
/// See the [crate-level documentation](index.html) for more information.
#[derive(Default)]
pub struct Simulation {
    /// Event scheduler.
    scheduler: Scheduler,
    /// Component container.
    pub components: Components,
    steps: u64,
}

impl Simulation {
    /// Creates a simulation whose component ids are derived from `seed`.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            scheduler: Scheduler::default(),
            components: Components::with_seed(seed),
            steps: 0,
        }
    }

    /// Returns the current simulation time.
    #[must_use]
    pub fn time(&self) -> SimTime {
        self.scheduler.time()
    }

    /// Number of events dispatched so far.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Performs one step of the simulation. Returns `Ok(true)` if there was in fact an event
    /// available to process, and `Ok(false)` otherwise, which signifies that the simulation
    /// ended. An error from the component aborts the run.
    pub fn step(&mut self) -> Result<bool, SimError> {
        let Some(event) = self.scheduler.pop() else {
            return Ok(false);
        };
        trace!(
            event_id = %event.id(),
            event_time = %event.time(),
            "Processing simulation step"
        );
        self.steps += 1;
        self.components
            .process_event_entry(event, &mut self.scheduler)?;
        Ok(true)
    }

    /// Runs the entire simulation.
    ///
    /// The stopping condition and other execution details depend on the executor used.
    /// See [`Execute`] and [`Executor`] for more details.
    #[instrument(skip(self, executor), fields(initial_time = %self.time()))]
    pub fn execute<E: Execute>(&mut self, executor: E) -> Result<(), SimError> {
        info!("Starting simulation execution");
        executor.execute(self)?;
        info!(
            final_time = %self.time(),
            steps = self.steps,
            "Simulation execution completed"
        );
        Ok(())
    }

    /// Adds a new component.
    #[must_use]
    #[instrument(skip(self, component), fields(component_type = std::any::type_name::<C>()))]
    pub fn add_component<E: std::fmt::Debug + 'static, C: Component<Event = E> + 'static>(
        &mut self,
        component: C,
    ) -> Key<E> {
        let key = self.components.register(component);
        debug!(component_id = %key.id(), "Added component to simulation");
        key
    }

    /// Remove a component: usually at the end of the simulation to peek at the state
    #[must_use]
    pub fn remove_component<E: std::fmt::Debug + 'static, C: Component<Event = E> + 'static>(
        &mut self,
        key: Key<E>,
    ) -> Option<C> {
        let result = self.components.remove(key);
        if result.is_some() {
            debug!(component_id = %key.id(), "Removed component from simulation");
        } else {
            warn!(component_id = %key.id(), "Attempted to remove non-existent component");
        }
        result
    }

    /// Get mutable access to a component
    pub fn get_component_mut<E: std::fmt::Debug + 'static, C: Component<Event = E> + 'static>(
        &mut self,
        key: Key<E>,
    ) -> Option<&mut C> {
        self.components.get_component_mut(key)
    }

    /// Schedules a new event to be executed `delay` units from now in component `component`.
    pub fn schedule<E: std::fmt::Debug + 'static>(
        &mut self,
        delay: f64,
        component: Key<E>,
        event: E,
    ) -> EventId {
        self.scheduler.schedule(delay, component, event)
    }

    /// Returns the time of the next scheduled event, or None if no events are scheduled.
    pub fn peek_next_event_time(&mut self) -> Option<SimTime> {
        self.scheduler.peek().map(|e| e.time())
    }

    /// Returns a ClockRef for reading the simulation time.
    pub fn clock(&self) -> ClockRef {
        self.scheduler.clock()
    }

    /// Check if there are pending events
    pub fn has_pending_events(&mut self) -> bool {
        self.scheduler.peek().is_some()
    }

    pub(crate) fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }
}
