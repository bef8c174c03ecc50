use crate::prelude::BeamType;

/// Finished beam: one averaged value per slot of the alignment window.
#[derive(Debug, Clone, PartialEq)]
pub struct Beam {
    pub kind: BeamType,
    /// Absolute time of slot 0.
    pub start_time: f64,
    pub sample_rate: f64,
    samples: Vec<f64>,
}

impl Beam {
    pub fn new(kind: BeamType, start_time: f64, sample_rate: f64, samples: Vec<f64>) -> Self {
        Self {
            kind,
            start_time,
            sample_rate,
            samples,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Absolute time of slot `index`.
    pub fn time_of(&self, index: usize) -> f64 {
        self.start_time + index as f64 / self.sample_rate
    }
}
