//! Process-relative monotonic timebase
//!
//! Wraps `std::time::Instant` behind a fixed epoch so timestamps can be kept as
//! plain `u64` nanoseconds (and therefore published through an `AtomicU64`).

use std::sync::OnceLock;
use std::time::{Duration, Instant};

/// Epoch all timestamps are measured from, initialized once
static EPOCH: OnceLock<Instant> = OnceLock::new();

/// Monotonic clock anchored at the process epoch
#[derive(Debug, Clone, Copy)]
pub struct Timebase;

impl Timebase {
    /// Fix the epoch. Called implicitly by every reading; calling it early at
    /// startup keeps the first timestamps small.
    pub fn init() {
        EPOCH.get_or_init(Instant::now);
    }

    fn epoch() -> Instant {
        *EPOCH.get_or_init(Instant::now)
    }

    /// Nanoseconds elapsed since the epoch.
    #[inline]
    pub fn now_nanos() -> u64 {
        // u64 nanoseconds covers ~584 years of uptime
        Self::epoch().elapsed().as_nanos() as u64
    }

    /// Elapsed time between two nanosecond readings.
    /// Returns zero if `end < start`.
    #[inline]
    pub fn elapsed(start_nanos: u64, end_nanos: u64) -> Duration {
        Duration::from_nanos(end_nanos.saturating_sub(start_nanos))
    }
}

/// A point in time, stored as nanoseconds since the process epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Create a timestamp from raw nanoseconds since the epoch.
    #[inline]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    /// Capture the current time.
    #[inline]
    pub fn now() -> Self {
        Self(Timebase::now_nanos())
    }

    /// Raw nanoseconds since the epoch.
    #[inline]
    pub const fn as_nanos(&self) -> u64 {
        self.0
    }

    /// Milliseconds since the epoch.
    #[inline]
    pub const fn as_millis(&self) -> u64 {
        self.0 / 1_000_000
    }

    /// Time elapsed since `earlier`, saturating at zero.
    #[inline]
    pub fn duration_since(&self, earlier: Timestamp) -> Duration {
        Timebase::elapsed(earlier.0, self.0)
    }

    /// Time elapsed between this timestamp and now.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        Timestamp::now().duration_since(*self)
    }

    /// Check if this timestamp is after another.
    #[inline]
    pub fn is_after(&self, other: Timestamp) -> bool {
        self.0 > other.0
    }
}

impl serde::Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u64(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let nanos = u64::deserialize(deserializer)?;
        Ok(Timestamp(nanos))
    }
}
