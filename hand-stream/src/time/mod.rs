//! Monotonic timing module
//!
//! Timestamps are nanoseconds since a process-wide epoch captured on first use.
//! They never go backward and are cheap to store in an atomic.

pub mod timebase;

pub use timebase::{Timebase, Timestamp};
