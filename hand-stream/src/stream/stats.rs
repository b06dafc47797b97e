//! Receiver statistics
//!
//! Counters are updated by the receive threads and read by anyone holding the
//! `Arc`. Relaxed ordering is enough: the values are only reported.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Cumulative receiver counters
#[derive(Debug, Default)]
pub struct ReceiverStats {
    /// Datagrams or stream reads received
    pub chunks_received: AtomicU64,
    /// Payload bytes received
    pub bytes_received: AtomicU64,
    /// Chunks dropped because they were not valid UTF-8
    pub chunks_undecodable: AtomicU64,
    /// Complete lines framed
    pub lines_received: AtomicU64,
    /// Lines that updated a hand
    pub records_applied: AtomicU64,
    /// Lines that failed to parse or carried too little data
    pub lines_ignored: AtomicU64,
    /// TCP connections accepted
    pub connections_accepted: AtomicU64,
    /// TCP connections that ended (closed, errored or stopped)
    pub connections_closed: AtomicU64,
}

impl ReceiverStats {
    pub(crate) fn record_chunk(&self, len: usize) {
        self.chunks_received.fetch_add(1, Ordering::Relaxed);
        self.bytes_received.fetch_add(len as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_line(&self, applied: bool) {
        self.lines_received.fetch_add(1, Ordering::Relaxed);
        if applied {
            self.records_applied.fetch_add(1, Ordering::Relaxed);
        } else {
            self.lines_ignored.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> StatsSnapshot {
        let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);
        StatsSnapshot {
            chunks_received: load(&self.chunks_received),
            bytes_received: load(&self.bytes_received),
            chunks_undecodable: load(&self.chunks_undecodable),
            lines_received: load(&self.lines_received),
            records_applied: load(&self.records_applied),
            lines_ignored: load(&self.lines_ignored),
            connections_accepted: load(&self.connections_accepted),
            connections_closed: load(&self.connections_closed),
        }
    }
}

/// Plain copy of `ReceiverStats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct StatsSnapshot {
    pub chunks_received: u64,
    pub bytes_received: u64,
    pub chunks_undecodable: u64,
    pub lines_received: u64,
    pub records_applied: u64,
    pub lines_ignored: u64,
    pub connections_accepted: u64,
    pub connections_closed: u64,
}

/// Counts events and reports the total once per interval.
#[derive(Debug)]
pub struct RateMeter {
    interval: Duration,
    count: u64,
    next_report: Instant,
}

impl RateMeter {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            count: 0,
            next_report: now + interval,
        }
    }

    /// Per-second meter starting now
    pub fn per_second() -> Self {
        Self::new(Duration::from_secs(1), Instant::now())
    }

    /// Count `n` events.
    pub fn add(&mut self, n: u64) {
        self.count += n;
    }

    /// Return the count for the finished interval once `now` passes its end.
    ///
    /// The next deadline advances by whole intervals so reports do not drift.
    pub fn poll(&mut self, now: Instant) -> Option<u64> {
        if now < self.next_report {
            return None;
        }
        while self.next_report <= now {
            self.next_report += self.interval;
        }
        Some(std::mem::take(&mut self.count))
    }

    /// Count not yet reported
    pub fn pending(&self) -> u64 {
        self.count
    }
}
