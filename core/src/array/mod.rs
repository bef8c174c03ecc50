pub mod dataset;
pub mod geometry;

pub use dataset::{RecordingEpoch, SensorDataset, SensorSite};
pub use geometry::{centroid, RunParameters, SlownessVector};
