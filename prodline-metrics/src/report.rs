//! Rendering a [`RunSummary`] for people and for programs.

use std::fmt::Write as _;

use crate::error::MetricsError;
use crate::summary::RunSummary;

/// Turns the final numbers of a run into output text.
pub trait Reporter {
    fn render(&self, summary: &RunSummary) -> Result<String, MetricsError>;
}

/// Tab-aligned report with three decimals and `hrs` units.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextReporter;

fn hours(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.3} hrs"),
        None => "no data".to_string(),
    }
}

fn plain(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v:.3}{unit}"),
        None => "no data".to_string(),
    }
}

impl Reporter for TextReporter {
    fn render(&self, s: &RunSummary) -> Result<String, MetricsError> {
        let mut out = String::new();
        let mut line = |text: String| -> Result<(), MetricsError> {
            writeln!(out, "{text}").map_err(|e| MetricsError::Export(e.to_string()))
        };
        line(format!("Horizon:\t\t{:.3} hrs (seed {})", s.horizon, s.seed))?;
        line(format!("Total free time:\t{:.3} hrs", s.total_free_time))?;
        line(format!("Total prep time:\t{:.3} hrs", s.total_prep_time))?;
        line(format!("Total working time:\t{:.3} hrs", s.total_working_time))?;
        line(format!("Total repair time:\t{:.3} hrs", s.total_repair_time))?;
        line(format!("Parts needed: {}", s.parts_arrived))?;
        line(format!("Parts made: {}", s.parts_completed))?;
        line(format!(
            "Breakdowns: {} interrupted, {} dropped",
            s.interruptions, s.breakdowns_dropped
        ))?;
        line("Waiting time in queue:".to_string())?;
        line(format!(" average:\t{}", hours(s.mean_wait)))?;
        line(format!(" maximum:\t{}", hours(s.max_wait)))?;
        line("Queue size:".to_string())?;
        line(format!(" average:\t{}", plain(s.mean_queue_size, "")))?;
        line(format!(" maximum:\t{}", plain(s.max_queue_size, "")))?;
        line(format!(
            "Mean empty queue duration:\t{}",
            hours(s.mean_empty_queue_duration)
        ))?;
        line(format!(
            "Free/working time ratio:\t{}",
            plain(s.free_working_ratio_pct, " %")
        ))?;
        line(format!("Throughput:\t{}", plain(s.throughput, " parts/hr")))?;
        Ok(out)
    }
}

/// `serde_json` rendering; empty statistics come out as `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReporter {
    pub pretty: bool,
}

impl JsonReporter {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Reporter for JsonReporter {
    fn render(&self, summary: &RunSummary) -> Result<String, MetricsError> {
        let json = if self.pretty {
            serde_json::to_string_pretty(summary)?
        } else {
            serde_json::to_string(summary)?
        };
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> RunSummary {
        RunSummary {
            horizon: 3.9,
            seed: 42,
            total_free_time: 0.5,
            total_prep_time: 1.0,
            total_working_time: 2.0,
            total_repair_time: 0.0,
            parts_arrived: 3,
            parts_completed: 2,
            interruptions: 0,
            breakdowns_dropped: 0,
            mean_working_time: Some(1.0),
            mean_wait: Some(1.0),
            max_wait: Some(2.0),
            mean_queue_size: Some(0.769),
            max_queue_size: Some(2.0),
            mean_empty_queue_duration: Some(0.4667),
            free_working_ratio_pct: Some(25.0),
            throughput: Some(0.5128),
        }
    }

    #[test]
    fn text_report_lists_totals() {
        let text = TextReporter.render(&summary()).unwrap();
        assert!(text.contains("Total free time:\t0.500 hrs"));
        assert!(text.contains("Parts needed: 3"));
        assert!(text.contains("Parts made: 2"));
        assert!(text.contains(" maximum:\t2.000 hrs"));
        assert!(text.contains("Free/working time ratio:\t25.000 %"));
    }

    #[test]
    fn text_report_handles_missing_data() {
        let mut empty = summary();
        empty.mean_wait = None;
        empty.max_wait = None;
        empty.free_working_ratio_pct = None;
        let text = TextReporter.render(&empty).unwrap();
        assert!(text.contains(" average:\tno data"));
        assert!(text.contains("Free/working time ratio:\tno data"));
    }

    #[test]
    fn json_report_round_trips() {
        let original = summary();
        let json = JsonReporter::default().render(&original).unwrap();
        assert!(!json.contains('\n'));
        let back: RunSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);

        let pretty = JsonReporter::pretty().render(&original).unwrap();
        assert!(pretty.contains("\n  \"parts_completed\": 2"));
    }
}
