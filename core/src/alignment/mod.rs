pub mod aligner;
pub mod window;

pub use aligner::{AlignmentPlan, SensorAlignment, TimeAligner};
pub use window::AlignmentWindow;
