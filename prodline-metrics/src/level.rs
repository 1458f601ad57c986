//! Time-weighted tracking of a piecewise-constant level.
//!
//! The level is only observed when it changes, at irregular event-driven
//! instants. Every change closes a window `(previous level, time it held)`
//! so the mean is weighted by how long each level persisted. Intervals during
//! which the level sat at zero are tracked separately.

use prodline_core::SimTime;
use serde::Serialize;

use crate::series::{Series, WeightedSeries};

/// One observed change of the level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelPoint {
    pub time: f64,
    pub level: u64,
}

#[derive(Debug, Clone)]
pub struct LevelTracker {
    level: u64,
    last_change: SimTime,
    empty_since: Option<SimTime>,
    windows: WeightedSeries,
    empty_intervals: Series,
    history: Vec<LevelPoint>,
}

impl Default for LevelTracker {
    fn default() -> Self {
        Self::starting_at(SimTime::zero())
    }
}

impl LevelTracker {
    /// A tracker whose level is zero from `start` on.
    pub fn starting_at(start: SimTime) -> Self {
        Self {
            level: 0,
            last_change: start,
            empty_since: Some(start),
            windows: WeightedSeries::new(),
            empty_intervals: Series::new(),
            history: vec![LevelPoint {
                time: start.as_f64(),
                level: 0,
            }],
        }
    }

    pub fn level(&self) -> u64 {
        self.level
    }

    /// Records that the level became `level` at `now`.
    pub fn set(&mut self, level: u64, now: SimTime) {
        self.close_window(now);
        if self.level == 0 && level > 0 {
            self.close_empty_interval(now);
        } else if self.level > 0 && level == 0 {
            self.empty_since = Some(now);
        }
        self.level = level;
        self.last_change = now;
        self.history.push(LevelPoint {
            time: now.as_f64(),
            level,
        });
    }

    /// Integrates the final partial window up to `horizon`.
    ///
    /// Calling it again with the same horizon records nothing new.
    pub fn close(&mut self, horizon: SimTime) {
        self.close_window(horizon);
        if self.level == 0 {
            self.close_empty_interval(horizon);
            self.empty_since = Some(horizon);
        }
        if horizon > self.last_change {
            self.last_change = horizon;
        }
    }

    /// Completed `(level, duration)` windows.
    pub fn windows(&self) -> &WeightedSeries {
        &self.windows
    }

    /// Durations of completed zero-level intervals.
    pub fn empty_intervals(&self) -> &Series {
        &self.empty_intervals
    }

    pub fn history(&self) -> &[LevelPoint] {
        &self.history
    }

    fn close_window(&mut self, now: SimTime) {
        let held = now.elapsed_since(self.last_change);
        if held > 0.0 {
            self.windows.push(self.level as f64, held);
        }
    }

    fn close_empty_interval(&mut self, now: SimTime) {
        if let Some(since) = self.empty_since.take() {
            let empty = now.elapsed_since(since);
            if empty > 0.0 {
                self.empty_intervals.push(empty);
            }
        }
    }
}
