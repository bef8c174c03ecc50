use beamcore::alignment::AlignmentWindow;
use beamcore::array::RecordingEpoch;
use beamcore::detection::DetectionReport;
use beamcore::math::StatsHelper;
use beamcore::telemetry::Metrics;
use beamcore::{Beam, BeamResult, BeamType};
use serde::Serialize;

/// Summary statistics of one beam.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct BeamSummary {
    pub kind: BeamType,
    pub samples: usize,
    pub max: f64,
    pub average: f64,
    pub rms: f64,
}

impl BeamSummary {
    pub fn from_beam(beam: &Beam) -> BeamResult<Self> {
        let (max, average) = StatsHelper::max_and_average(beam.samples())?;
        Ok(Self {
            kind: beam.kind,
            samples: beam.len(),
            max,
            average,
            rms: StatsHelper::rms(beam.samples()),
        })
    }
}

/// Everything one workflow run produced, ready to print as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub epoch: RecordingEpoch,
    pub window: AlignmentWindow,
    pub beam_length: usize,
    pub workers: usize,
    pub coherent: BeamSummary,
    pub incoherent: BeamSummary,
    pub detected_on: BeamType,
    pub detection: DetectionReport,
    /// Absolute onset time of each detected event.
    pub onset_times: Vec<f64>,
    /// Absolute end time of each event, `None` while still open.
    pub end_times: Vec<Option<f64>>,
    pub metrics: Metrics,
}
