use serde::{Deserialize, Serialize};

/// Flavour of beam produced by the beamformer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BeamType {
    /// Signed mean of the aligned samples.
    Coherent,
    /// Mean of the absolute aligned samples (envelope).
    Incoherent,
}

impl BeamType {
    /// Maps the numeric beam codes (`1` coherent, `2` incoherent).
    pub fn from_code(code: i32) -> BeamResult<Self> {
        match code {
            1 => Ok(BeamType::Coherent),
            2 => Ok(BeamType::Incoherent),
            other => Err(BeamError::Parameter(format!("unknown beam type {}", other))),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            BeamType::Coherent => 1,
            BeamType::Incoherent => 2,
        }
    }

    pub(crate) fn contribution(self, sample: f64) -> f64 {
        match self {
            BeamType::Coherent => sample,
            BeamType::Incoherent => sample.abs(),
        }
    }
}

impl std::fmt::Display for BeamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BeamType::Coherent => write!(f, "coherent"),
            BeamType::Incoherent => write!(f, "incoherent"),
        }
    }
}

/// Common error type for alignment, beamforming and detection.
#[derive(thiserror::Error, Debug)]
pub enum BeamError {
    #[error("geometry error: {0}")]
    Geometry(String),
    #[error("invalid parameter: {0}")]
    Parameter(String),
    #[error("invalid dataset: {0}")]
    Dataset(String),
    #[error("resource exhaustion: {0}")]
    ResourceExhaustion(String),
    #[error("worker pool failure: {0}")]
    WorkerPool(String),
}

pub type BeamResult<T> = Result<T, BeamError>;
