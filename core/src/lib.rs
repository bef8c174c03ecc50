//! Beamforming core for spatially distributed sensor arrays.
//!
//! Recordings are time-aligned against a slowness vector, summed into a
//! single beam by a fixed pool of workers that each own a disjoint slice of
//! the output, and the beam is then scanned by an STA/LTA onset detector.

pub mod alignment;
pub mod array;
pub mod detection;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use alignment::{AlignmentPlan, AlignmentWindow, TimeAligner};
pub use array::{RunParameters, SensorDataset, SensorSite};
pub use detection::{DetectionReport, StaLtaConfig, StaLtaDetector};
pub use prelude::{BeamError, BeamResult, BeamType};
pub use processing::{Beam, Beamformer};
