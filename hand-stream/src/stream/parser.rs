//! Record parser
//!
//! One line is `<label>,<f1>,<f2>,...`. The label names the hand side and the
//! record kind by case-insensitive substring, e.g. `Right Wrist` or
//! `left_landmarks`. Bad lines are dropped whole; bad numeric fields are
//! dropped one by one.

use crate::hand::types::Side;
use serde::Serialize;

/// What a record carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Wrist position and orientation
    Wrist,
    /// Flat list of landmark positions
    Landmarks,
}

/// One parsed line
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub side: Side,
    pub kind: RecordKind,
    /// Numeric fields that parsed, in wire order
    pub values: Vec<f64>,
}

/// Parse one line into a record.
///
/// Returns `None` when the label names no known kind or no side. Numeric
/// fields that are empty or fail to parse are skipped, so `values` can be
/// shorter than the kind requires; the hand state rejects those later.
pub fn parse_line(line: &str) -> Option<RawRecord> {
    let mut fields = line.split(',').map(str::trim);

    let label = fields.next()?.to_lowercase();
    let kind = if label.contains("wrist") {
        RecordKind::Wrist
    } else if label.contains("landmarks") {
        RecordKind::Landmarks
    } else {
        return None;
    };
    let side = Side::from_label(&label)?;

    let values = fields
        .filter(|field| !field.is_empty())
        .filter_map(|field| field.parse::<f64>().ok())
        .collect();

    Some(RawRecord { side, kind, values })
}
