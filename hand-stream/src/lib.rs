//! # Hand Stream
//!
//! Live hand-tracking telemetry receiver. A remote tracker streams wrist
//! poses and finger landmarks as comma-separated text lines over UDP or TCP;
//! this library reconstructs each hand's skeleton in a right-handed world
//! frame and keeps a smoothed view window for a renderer.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use hand_stream::{Config, HandStateStore, LogSink, StopToken, StreamReceiver};
//! use hand_stream::view::run_view_loop;
//!
//! let config = Config::default();
//! let store = Arc::new(HandStateStore::new());
//! let stop = StopToken::new();
//!
//! let mut receiver = StreamReceiver::new(config.transport.clone(), Arc::clone(&store), stop.clone());
//! receiver.start()?;
//!
//! let mut sink = LogSink::default();
//! run_view_loop(&store, &stop, &config.view, &mut sink, None)?;
//! receiver.stop();
//! # Ok::<(), hand_stream::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`stream`]: line framing, record parsing and the socket receiver
//! - [`geometry`]: quaternion utilities and the device-to-world basis change
//! - [`hand`]: per-hand live state, the two-hand store and finger topology
//! - [`view`]: bounds smoothing, the consumer loop and frame sinks
//! - [`time`]: process-relative monotonic timestamps
//! - [`app`]: CLI and configuration management
//!
//! ## Data Flow
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Socket    │───▶│ Line Framer │───▶│   Parser    │───▶│   Basis     │
//! │ (receiver)  │    │             │    │             │    │  Change     │
//! └─────────────┘    └─────────────┘    └─────────────┘    └─────────────┘
//!                                                                 │
//!                                                                 ▼
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │  FrameSink  │◀───│  View Loop  │◀───│   Bounds    │◀───│ Hand State  │
//! │ (renderer)  │    │             │    │  Smoother   │    │   Store     │
//! └─────────────┘    └─────────────┘    └─────────────┘    └─────────────┘
//! ```

pub mod time;
pub mod geometry;
pub mod hand;
pub mod stream;
pub mod view;
pub mod app;

// Re-export commonly used types
pub use app::config::{Config, Protocol};
pub use geometry::{Quat, Vec3};
pub use hand::{HandStateStore, Pose, Side};
pub use stream::{StopToken, StreamReceiver};
pub use time::timebase::{Timebase, Timestamp};
pub use view::{FrameSink, JsonLinesSink, LogSink, ViewFrame};

/// Result type alias for hand-stream
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for hand-stream
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to bind {protocol} receiver on {addr}: {source}")]
    Bind {
        protocol: Protocol,
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Receiver error: {0}")]
    Receiver(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
