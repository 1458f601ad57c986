//! Properties that hold for every seed.

use prodline_model::{LineConfig, LineRun, MachineState, ProductionLine, REPAIR_CYCLES};
use proptest::prelude::*;

fn run(seed: u64, horizon: f64) -> LineRun {
    ProductionLine::new(LineConfig::default().with_seed(seed))
        .unwrap()
        .run(horizon)
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn completed_never_exceeds_arrived(seed in any::<u64>(), horizon in 0.0f64..150.0) {
        let run = run(seed, horizon);
        let s = &run.summary;
        prop_assert!(s.parts_completed <= s.parts_arrived);
        // Every taken job is either finished or still on the machine.
        let taken = run.stats.jobs().len() as u64;
        prop_assert!(taken >= s.parts_completed);
        prop_assert!(taken - s.parts_completed <= 1);
        prop_assert!(taken <= s.parts_arrived);
    }

    #[test]
    fn jobs_are_served_first_in_first_out(seed in any::<u64>()) {
        let run = run(seed, 120.0);
        for pair in run.stats.jobs().windows(2) {
            prop_assert!(pair[0].arrived_at <= pair[1].arrived_at);
            prop_assert!(pair[0].started_at <= pair[1].started_at);
        }
        for job in run.stats.jobs() {
            prop_assert!(job.queue_wait >= 0.0);
            prop_assert_eq!(job.wait(), job.queue_wait + job.repair_billed);
        }
    }

    #[test]
    fn every_interruption_costs_three_repairs(seed in any::<u64>()) {
        let run = run(seed, 200.0);
        let repairs = run.stats.repair_time().len() as u64;
        let full = u64::from(REPAIR_CYCLES) * run.summary.interruptions;
        if run.machine_state == MachineState::Repairing {
            prop_assert!(repairs < full);
            prop_assert!(repairs + u64::from(REPAIR_CYCLES) >= full);
        } else {
            prop_assert_eq!(repairs, full);
        }
        let billed: f64 = run.stats.jobs().iter().map(|j| j.repair_billed).sum();
        prop_assert!((billed - run.summary.total_repair_time).abs() < 1e-9);
        let per_job: u64 = run.stats.jobs().iter().map(|j| u64::from(j.interruptions)).sum();
        prop_assert_eq!(per_job, run.summary.interruptions);
    }

    #[test]
    fn same_seed_is_bit_identical(seed in any::<u64>()) {
        let a = run(seed, 80.0);
        let b = run(seed, 80.0);
        prop_assert_eq!(&a.summary, &b.summary);
        prop_assert_eq!(a.stats.jobs(), b.stats.jobs());
        prop_assert_eq!(a.events_dispatched, b.events_dispatched);
    }
}
