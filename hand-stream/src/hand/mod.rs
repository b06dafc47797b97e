//! Hand state module
//!
//! Live per-hand pose and landmark storage, world-space reconstruction and the
//! static finger topology used to draw bones.

pub mod skeleton;
pub mod state;
pub mod store;
pub mod types;

pub use skeleton::{finger_segments, Finger, Segment};
pub use state::{HandState, Pose};
pub use store::HandStateStore;
pub use types::Side;
