//! View module
//!
//! Consumer side of the pipeline: window smoothing, the tick loop and the
//! renderer boundary.

pub mod bounds;
pub mod consumer;
pub mod sink;

pub use bounds::{Bounds, BoundsSmoother};
pub use consumer::{run_view_loop, FrameSink, HandFrame, ViewFrame, ViewState};
pub use sink::{JsonLinesSink, LogSink};
