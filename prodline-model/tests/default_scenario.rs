//! The default line: seed 42, horizon 500.

use prodline_metrics::RunSummary;
use prodline_model::{LineConfig, MachineState, ProductionLine};
use serde_json::Value;

const BASELINE: &str = include_str!("data/default_seed42_h500.json");
const TOLERANCE: f64 = 1e-9;

fn assert_matches(field: &str, actual: f64, expected: f64) {
    let scale = expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= TOLERANCE * scale,
        "{field}: expected {expected}, got {actual}"
    );
}

fn assert_optional(field: &str, actual: Option<f64>, expected: Option<f64>) {
    match (actual, expected) {
        (Some(a), Some(e)) => assert_matches(field, a, e),
        (None, None) => {}
        _ => panic!("{field}: expected {expected:?}, got {actual:?}"),
    }
}

fn default_run() -> prodline_model::LineRun {
    ProductionLine::new(LineConfig::default())
        .unwrap()
        .run_configured()
        .unwrap()
}

#[test]
fn default_run_is_reproducible() {
    let a = default_run();
    let b = default_run();
    assert_eq!(a.summary, b.summary);
    assert_eq!(a.summary.seed, 42);
    assert_eq!(a.summary.horizon, 500.0);
}

#[test]
fn default_run_matches_recorded_baseline() {
    let baseline: Value = serde_json::from_str(BASELINE).unwrap();
    let expected: RunSummary = serde_json::from_value(baseline["summary"].clone()).unwrap();
    let run = default_run();
    let s = &run.summary;

    assert_eq!(s.seed, expected.seed);
    assert_eq!(s.horizon, expected.horizon);
    assert_eq!(s.parts_arrived, expected.parts_arrived);
    assert_eq!(s.parts_completed, expected.parts_completed);
    assert_eq!(s.interruptions, expected.interruptions);
    assert_eq!(s.breakdowns_dropped, expected.breakdowns_dropped);

    assert_matches("total_free_time", s.total_free_time, expected.total_free_time);
    assert_matches("total_prep_time", s.total_prep_time, expected.total_prep_time);
    assert_matches("total_working_time", s.total_working_time, expected.total_working_time);
    assert_matches("total_repair_time", s.total_repair_time, expected.total_repair_time);
    assert_optional("mean_working_time", s.mean_working_time, expected.mean_working_time);
    assert_optional("mean_wait", s.mean_wait, expected.mean_wait);
    assert_optional("max_wait", s.max_wait, expected.max_wait);
    assert_optional("mean_queue_size", s.mean_queue_size, expected.mean_queue_size);
    assert_optional("max_queue_size", s.max_queue_size, expected.max_queue_size);
    assert_optional(
        "mean_empty_queue_duration",
        s.mean_empty_queue_duration,
        expected.mean_empty_queue_duration,
    );
    assert_optional(
        "free_working_ratio_pct",
        s.free_working_ratio_pct,
        expected.free_working_ratio_pct,
    );
    assert_optional("throughput", s.throughput, expected.throughput);

    assert_eq!(baseline["machine_state"], "Preparing");
    assert_eq!(run.machine_state, MachineState::Preparing);
    assert_eq!(
        Some(run.events_dispatched),
        baseline["events_dispatched"].as_u64()
    );
}

#[test]
fn default_run_is_in_a_plausible_range() {
    let s = default_run().summary;

    // About one arrival per hour.
    assert!((400..=600).contains(&s.parts_arrived), "arrived {}", s.parts_arrived);
    assert!(s.parts_completed <= s.parts_arrived);
    assert!(s.parts_completed as f64 >= 0.8 * s.parts_arrived as f64);

    // A breakdown every ~20 hours, each one either interrupting or dropped.
    let fired = s.interruptions + s.breakdowns_dropped;
    assert!((22..=26).contains(&fired), "fired {fired}");
    assert!(s.interruptions >= 1);

    let mean_prep = s.total_prep_time / s.parts_completed as f64;
    assert!((0.3..0.4).contains(&mean_prep), "mean prep {mean_prep}");
    let mean_work = s.mean_working_time.unwrap();
    assert!((0.45..0.55).contains(&mean_work), "mean working {mean_work}");

    assert!(s.mean_wait.unwrap() > 0.0);
    assert!(s.max_wait.unwrap() >= s.mean_wait.unwrap());
    assert!(s.max_queue_size.unwrap() >= s.mean_queue_size.unwrap());
    assert!(s.free_working_ratio_pct.is_some());
}

#[test]
fn different_seeds_differ() {
    let a = ProductionLine::new(LineConfig::default().with_seed(1))
        .unwrap()
        .run(100.0)
        .unwrap();
    let b = ProductionLine::new(LineConfig::default().with_seed(2))
        .unwrap()
        .run(100.0)
        .unwrap();
    assert_ne!(a.summary, b.summary);
}

#[test]
fn invalid_configuration_fails_construction() {
    let config = LineConfig {
        prep_low: 0.5,
        prep_high: 0.2,
        ..LineConfig::default()
    };
    assert!(ProductionLine::new(config).is_err());

    let line = ProductionLine::new(LineConfig::default()).unwrap();
    assert!(line.run(-1.0).is_err());
}

#[test]
fn configuration_file_is_honoured() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("line.json");
    std::fs::write(&path, r#"{ "seed": 5, "horizon": 40.0, "repair_rate": 2.0 }"#).unwrap();

    let config = LineConfig::from_json_file(&path).unwrap();
    let run = ProductionLine::new(config).unwrap().run_configured().unwrap();
    assert_eq!(run.summary.horizon, 40.0);
    assert_eq!(run.summary.seed, 5);
}
