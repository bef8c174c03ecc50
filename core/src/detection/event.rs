use crate::processing::beam::Beam;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum DetectorState {
    #[default]
    Quiet,
    InSignal,
}

/// One onset found by the detector, as beam slot indices.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectionEvent {
    pub start: usize,
    /// `None` while the event is still open at the end of the scan.
    pub end: Option<usize>,
    /// Highest STA/LTA ratio seen while the event was open.
    pub peak_ratio: f64,
}

impl DetectionEvent {
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    pub fn onset_time(&self, beam: &Beam) -> f64 {
        beam.time_of(self.start)
    }

    pub fn end_time(&self, beam: &Beam) -> Option<f64> {
        self.end.map(|end| beam.time_of(end))
    }
}

/// Result of one detector scan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DetectionReport {
    pub events: Vec<DetectionEvent>,
    pub count: usize,
    /// Samples passed over because the long-term average was zero.
    pub skipped: usize,
    pub final_state: DetectorState,
}

impl DetectionReport {
    pub fn open_event(&self) -> Option<&DetectionEvent> {
        self.events.last().filter(|event| event.is_open())
    }
}
