//! Hand skeleton topology
//!
//! Maps a landmark array to 20 finger bones (4 per finger), each finger rooted
//! at the wrist. Senders either include a wrist replica at row 0 (21+ rows)
//! or start directly at the thumb metacarpal (20 rows).

use crate::geometry::Vec3;
use serde::Serialize;

pub const FINGER_COUNT: usize = 5;
pub const BONES_PER_FINGER: usize = 4;
pub const SEGMENT_COUNT: usize = FINGER_COUNT * BONES_PER_FINGER;

/// Landmark rows when the wrist replica is included at index 0
pub const ROWS_WITH_WRIST: usize = 21;

/// Landmark rows needed to draw every finger
pub const MIN_ROWS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Little,
}

impl Finger {
    /// Fingers in landmark order
    pub const ALL: [Finger; FINGER_COUNT] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Little,
    ];

    /// Landmark rows of this finger's four joints, base first.
    pub const fn joints(self, first_row: usize) -> [usize; BONES_PER_FINGER] {
        let base = first_row + self as usize * BONES_PER_FINGER;
        [base, base + 1, base + 2, base + 3]
    }
}

/// One bone, ready to draw as a line
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub finger: Finger,
    pub start: Vec3,
    pub end: Vec3,
}

/// Row of the first finger joint for an array of `rows` landmarks.
#[inline]
pub const fn first_finger_row(rows: usize) -> usize {
    if rows >= ROWS_WITH_WRIST {
        1
    } else {
        0
    }
}

/// Build the 20 bone segments for one hand.
///
/// Each finger yields wrist→base, base→base+1, base+1→base+2 and
/// base+2→base+3. Returns `None` when there are too few rows to index every
/// finger.
pub fn finger_segments(wrist: &Vec3, landmarks: &[Vec3]) -> Option<Vec<Segment>> {
    if landmarks.len() < MIN_ROWS {
        return None;
    }
    let first_row = first_finger_row(landmarks.len());

    let mut segments = Vec::with_capacity(SEGMENT_COUNT);
    for finger in Finger::ALL {
        let [a, b, c, d] = finger.joints(first_row);
        let chain = [*wrist, landmarks[a], landmarks[b], landmarks[c], landmarks[d]];
        segments.extend(chain.windows(2).map(|bone| Segment {
            finger,
            start: bone[0],
            end: bone[1],
        }));
    }
    Some(segments)
}
