//! Hand state store
//!
//! Owns exactly one `HandState` per side for the lifetime of the process.
//! Shared behind an `Arc` between the stream receiver (sole writer) and the
//! view loop (reader).

use super::state::HandState;
use super::types::Side;
use crate::geometry::Vec3;
use crate::stream::parser::{parse_line, RawRecord, RecordKind};
use crate::time::timebase::Timestamp;
use std::time::Duration;

/// Latest-sample store for both hands
#[derive(Debug)]
pub struct HandStateStore {
    hands: [HandState; 2],
}

impl HandStateStore {
    pub fn new() -> Self {
        Self {
            hands: Side::ALL.map(HandState::new),
        }
    }

    /// State for one side
    #[inline]
    pub fn hand(&self, side: Side) -> &HandState {
        &self.hands[side.index()]
    }

    pub fn update_wrist(&self, side: Side, values: &[f64]) -> bool {
        self.hand(side).update_wrist(values)
    }

    pub fn update_landmarks(&self, side: Side, values: &[f64]) -> bool {
        self.hand(side).update_landmarks(values)
    }

    /// Route a parsed record to its hand.
    /// Returns false when the payload was too short to change anything.
    pub fn apply(&self, record: &RawRecord) -> bool {
        match record.kind {
            RecordKind::Wrist => self.update_wrist(record.side, &record.values),
            RecordKind::Landmarks => self.update_landmarks(record.side, &record.values),
        }
    }

    /// Parse and apply one line. Returns true if a hand was updated.
    pub fn ingest_line(&self, line: &str) -> bool {
        parse_line(line).is_some_and(|record| self.apply(&record))
    }

    pub fn world_points(&self, side: Side) -> Option<Vec<Vec3>> {
        self.hand(side).world_points()
    }

    pub fn wrist_point(&self, side: Side) -> Option<Vec3> {
        self.hand(side).wrist_point()
    }

    pub fn last_update(&self, side: Side) -> Timestamp {
        self.hand(side).last_update()
    }

    /// Time since `side` was last updated
    pub fn age(&self, side: Side) -> Duration {
        self.hand(side).age()
    }
}

impl Default for HandStateStore {
    fn default() -> Self {
        Self::new()
    }
}
