pub mod beam;
pub mod beamformer;
pub mod buffer;
pub mod partition;

pub use beam::Beam;
pub use beamformer::Beamformer;
pub use buffer::BeamBuffer;
pub use partition::{partition, Segment};
