//! Append-only sample series.
//!
//! Statistics over an empty series are `None`, never a fabricated zero.

use serde::{Deserialize, Serialize};

/// Plain samples, each counted once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    values: Vec<f64>,
}

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Sum of all samples; positive zero for an empty series.
    pub fn sum(&self) -> f64 {
        self.values.iter().fold(0.0, |acc, v| acc + v)
    }

    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.sum() / self.values.len() as f64)
        }
    }

    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }
}

impl FromIterator<f64> for Series {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Samples paired with the weight (duration) each one persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightedSeries {
    samples: Vec<(f64, f64)>,
}

impl WeightedSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64, weight: f64) {
        self.samples.push((value, weight));
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[(f64, f64)] {
        &self.samples
    }

    pub fn total_weight(&self) -> f64 {
        self.samples.iter().fold(0.0, |acc, (_, w)| acc + w)
    }

    /// `Σ(value·weight) / Σ(weight)`; `None` when the total weight is zero.
    pub fn weighted_mean(&self) -> Option<f64> {
        let total = self.total_weight();
        if total <= 0.0 {
            return None;
        }
        let weighted = self.samples.iter().fold(0.0, |acc, (v, w)| acc + v * w);
        Some(weighted / total)
    }

    pub fn max(&self) -> Option<f64> {
        self.samples.iter().map(|(v, _)| *v).reduce(f64::max)
    }
}
