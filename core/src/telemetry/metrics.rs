use serde::Serialize;
use std::sync::Mutex;

/// Counters accumulated across beamforming runs.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub beams_formed: usize,
    pub samples_accumulated: usize,
    pub events_detected: usize,
    pub errors: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    /// Records one finished beam of `samples` slots summed over `sensors`.
    pub fn record_beam(&self, samples: usize, sensors: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.beams_formed += 1;
            metrics.samples_accumulated += samples * sensors;
        }
    }

    pub fn record_events(&self, count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.events_detected += count;
        }
    }

    pub fn record_error(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.errors += 1;
        }
    }

    pub fn snapshot(&self) -> Metrics {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            Metrics::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
