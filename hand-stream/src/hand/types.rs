//! Core hand types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which hand a record or state belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Side {
    Left = 0,
    Right = 1,
}

impl Side {
    /// Both sides, in storage order
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    /// Slot index in fixed two-element storage
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    /// Find the side named in a lower-cased record label.
    ///
    /// `right` is checked first, so a label naming both sides resolves to
    /// `Right`. No known sender produces such labels.
    pub fn from_label(label: &str) -> Option<Side> {
        if label.contains("right") {
            Some(Side::Right)
        } else if label.contains("left") {
            Some(Side::Left)
        } else {
            None
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_index() {
        assert_eq!(Side::Left.index(), 0);
        assert_eq!(Side::Right.index(), 1);
        assert_eq!(Side::ALL.map(Side::index), [0, 1]);
    }

    #[test]
    fn test_side_from_label() {
        assert_eq!(Side::from_label("right wrist"), Some(Side::Right));
        assert_eq!(Side::from_label("left landmarks"), Some(Side::Left));
        assert_eq!(Side::from_label("wrist"), None);
    }

    #[test]
    fn test_side_from_label_prefers_right() {
        assert_eq!(Side::from_label("left right wrist"), Some(Side::Right));
    }

    #[test]
    fn test_side_serialization() {
        assert_eq!(serde_json::to_string(&Side::Right).unwrap(), "\"right\"");
        let side: Side = serde_json::from_str("\"left\"").unwrap();
        assert_eq!(side, Side::Left);
        assert_eq!(Side::Left.to_string(), "left");
    }
}
