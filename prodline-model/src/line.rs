//! Wiring and running one production line.

use std::cell::RefCell;
use std::rc::Rc;

use prodline_core::logging::{events, simulation_span};
use prodline_core::{BoundedCounter, Executor, SimError, SimTime, Simulation};
use prodline_metrics::{RunSummary, StatisticsAccumulator};

use crate::arrival::{ArrivalEvent, ArrivalProcess};
use crate::breakdown::{BreakdownEvent, BreakdownProcess};
use crate::config::{validate_horizon, LineConfig};
use crate::job_queue::JobQueue;
use crate::machine::{MachineEvent, MachineProcess, MachineState};
use crate::variates::RandomVariateSource;

/// Result of [`ProductionLine::run`].
#[derive(Debug, Clone)]
pub struct LineRun {
    pub summary: RunSummary,
    /// Raw series, closed at the horizon.
    pub stats: StatisticsAccumulator,
    /// Machine state when the horizon was reached.
    pub machine_state: MachineState,
    /// Events dispatched during the run.
    pub events_dispatched: u64,
}

/// A configured line, ready to run once.
#[derive(Debug)]
pub struct ProductionLine {
    config: LineConfig,
    variates: RandomVariateSource,
}

impl ProductionLine {
    /// Validates `config` and builds its seeded distributions.
    pub fn new(config: LineConfig) -> Result<Self, SimError> {
        let variates = RandomVariateSource::from_config(&config)?;
        Ok(Self { config, variates })
    }

    /// Runs with caller-supplied draws, typically scripted delays in tests.
    pub fn with_variates(config: LineConfig, variates: RandomVariateSource) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self { config, variates })
    }

    pub fn config(&self) -> &LineConfig {
        &self.config
    }

    /// Runs until `config.horizon`.
    pub fn run_configured(self) -> Result<LineRun, SimError> {
        let horizon = self.config.horizon;
        self.run(horizon)
    }

    /// Dispatches every event at or before `horizon`, then summarizes.
    pub fn run(self, horizon: f64) -> Result<LineRun, SimError> {
        validate_horizon(horizon)?;
        let end = SimTime::new(horizon)?;
        let seed = self.config.seed;
        let span = simulation_span("production_line");
        let _guard = span.enter();

        let mut sim = Simulation::with_seed(seed);
        let stats = Rc::new(RefCell::new(StatisticsAccumulator::new()));
        let variates = Rc::new(RefCell::new(self.variates));
        let queue = JobQueue::new(Rc::clone(&stats));
        let counter = BoundedCounter::new();

        let machine = MachineProcess::new(
            Rc::clone(&variates),
            queue.clone(),
            counter.clone(),
            Rc::clone(&stats),
        );
        let busy = machine.busy_flag();
        let machine_key = sim.add_component(machine);
        let arrival_key = sim.add_component(ArrivalProcess::new(
            Rc::clone(&variates),
            queue,
            counter,
            Rc::clone(&stats),
        ));
        let breakdown_key = sim.add_component(BreakdownProcess::new(
            Rc::clone(&variates),
            machine_key,
            busy,
            Rc::clone(&stats),
        ));

        // Same-instant start order: arrivals, breakdowns, machine.
        sim.schedule(0.0, arrival_key, ArrivalEvent::Start);
        sim.schedule(0.0, breakdown_key, BreakdownEvent::Start);
        sim.schedule(0.0, machine_key, MachineEvent::Start);

        events::simulation_started("production_line", end, seed);
        sim.execute(Executor::timed(end))?;
        events::simulation_completed("production_line", sim.time(), sim.steps());

        let machine_state = sim
            .get_component_mut::<MachineEvent, MachineProcess>(machine_key)
            .map(|m| m.state())
            .ok_or_else(|| SimError::ComponentNotFound {
                id: machine_key.id().to_string(),
            })?;
        let events_dispatched = sim.steps();
        // Components hold the other handles to the statistics.
        drop(sim);

        let mut stats = Rc::try_unwrap(stats)
            .map_err(|_| SimError::invariant("statistics still shared after the run"))?
            .into_inner();
        stats.close(end);
        let summary = RunSummary::from_stats(&stats, horizon, seed);

        Ok(LineRun {
            summary,
            stats,
            machine_state,
            events_dispatched,
        })
    }
}
