//! An in-memory `metrics::Recorder`.
//!
//! The accumulator emits standard `metrics` counters, gauges and histograms.
//! Installing a [`MetricsCapture`] as a *local* recorder collects them
//! without touching global state:
//!
//! ```rust
//! # use prodline_metrics::{MetricsCapture, with_capture_recorder};
//! let capture = MetricsCapture::new();
//! with_capture_recorder(&capture, || {
//!     metrics::counter!("prodline_parts_arrived_total").increment(1);
//! });
//! assert_eq!(capture.counter("prodline_parts_arrived_total"), Some(1));
//! ```

use metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Captured {
    counters: BTreeMap<String, u64>,
    gauges: BTreeMap<String, f64>,
    histograms: BTreeMap<String, Vec<f64>>,
}

/// Shared store of captured metric values, keyed by metric name.
#[derive(Debug, Clone, Default)]
pub struct MetricsCapture {
    inner: Arc<Mutex<Captured>>,
}

impl MetricsCapture {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Captured> {
        // A poisoned lock only means a panicking thread held it; the maps are
        // still consistent.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn counter(&self, name: &str) -> Option<u64> {
        self.lock().counters.get(name).copied()
    }

    pub fn gauge(&self, name: &str) -> Option<f64> {
        self.lock().gauges.get(name).copied()
    }

    /// Every value recorded into the histogram `name`, in order.
    pub fn histogram(&self, name: &str) -> Vec<f64> {
        self.lock().histograms.get(name).cloned().unwrap_or_default()
    }

    /// All counters, sorted by name.
    pub fn counters(&self) -> Vec<(String, u64)> {
        self.lock()
            .counters
            .iter()
            .map(|(name, value)| (name.clone(), *value))
            .collect()
    }
}

/// Runs `f` with `capture` installed as the thread-local recorder.
pub fn with_capture_recorder<T>(capture: &MetricsCapture, f: impl FnOnce() -> T) -> T {
    metrics::with_local_recorder(capture, f)
}

struct CounterHandle {
    capture: MetricsCapture,
    name: String,
}

impl metrics::CounterFn for CounterHandle {
    fn increment(&self, value: u64) {
        *self.capture.lock().counters.entry(self.name.clone()).or_default() += value;
    }

    fn absolute(&self, value: u64) {
        self.capture.lock().counters.insert(self.name.clone(), value);
    }
}

struct GaugeHandle {
    capture: MetricsCapture,
    name: String,
}

impl metrics::GaugeFn for GaugeHandle {
    fn increment(&self, value: f64) {
        *self.capture.lock().gauges.entry(self.name.clone()).or_default() += value;
    }

    fn decrement(&self, value: f64) {
        *self.capture.lock().gauges.entry(self.name.clone()).or_default() -= value;
    }

    fn set(&self, value: f64) {
        self.capture.lock().gauges.insert(self.name.clone(), value);
    }
}

struct HistogramHandle {
    capture: MetricsCapture,
    name: String,
}

impl metrics::HistogramFn for HistogramHandle {
    fn record(&self, value: f64) {
        self.capture
            .lock()
            .histograms
            .entry(self.name.clone())
            .or_default()
            .push(value);
    }
}

impl Recorder for MetricsCapture {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn register_counter(&self, key: &Key, _metadata: &Metadata<'_>) -> Counter {
        Counter::from_arc(Arc::new(CounterHandle {
            capture: self.clone(),
            name: key.name().to_string(),
        }))
    }

    fn register_gauge(&self, key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        Gauge::from_arc(Arc::new(GaugeHandle {
            capture: self.clone(),
            name: key.name().to_string(),
        }))
    }

    fn register_histogram(&self, key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        Histogram::from_arc(Arc::new(HistogramHandle {
            capture: self.clone(),
            name: key.name().to_string(),
        }))
    }
}
