pub mod event;
pub mod stalta;

pub use event::{DetectionEvent, DetectionReport, DetectorState};
pub use stalta::{StaLtaConfig, StaLtaDetector};
