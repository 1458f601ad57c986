use clap::Parser;
use prodline::cli::{run, Cli};

#[test]
fn json_report_and_exports() {
    let dir = tempfile::tempdir().unwrap();
    let json_path = dir.path().join("run.json");
    let csv_path = dir.path().join("run.csv");

    let cli = Cli::try_parse_from([
        "prodline",
        "--horizon",
        "50",
        "--seed",
        "3",
        "--format",
        "json",
        "--export-json",
        json_path.to_str().unwrap(),
        "--export-csv",
        csv_path.to_str().unwrap(),
    ])
    .unwrap();

    let report = run(&cli).unwrap();
    let summary: serde_json::Value = serde_json::from_str(&report).unwrap();
    assert_eq!(summary["seed"], 3);
    assert_eq!(summary["horizon"], 50.0);

    let exported: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(exported["summary"], summary);
    assert!(dir.path().join("run_jobs.csv").exists());
    assert!(dir.path().join("run_queue.csv").exists());
}

#[test]
fn missing_config_file_is_reported() {
    let cli = Cli::try_parse_from(["prodline", "--config", "/nonexistent/line.json"]).unwrap();
    let err = run(&cli).unwrap_err();
    assert!(err.to_string().contains("cannot read"));
}
