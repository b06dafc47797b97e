//! Source-to-world basis change
//!
//! The tracking device reports in a left-handed frame (x right, y up,
//! z forward). The display frame is right-handed (x forward, y left, z up).
//! Positions and orientations are converted exactly once, at ingestion.

use super::quaternion::{matrix_to_quat, quat_to_matrix, Mat3, Quat, Vec3};

/// Rows of the basis-change matrix `B`
pub const SOURCE_TO_WORLD: [[f64; 3]; 3] = [
    [0.0, 0.0, 1.0],
    [-1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
];

/// The basis-change matrix `B` as an `nalgebra` matrix.
pub fn source_to_world() -> Mat3 {
    Mat3::from_fn(|r, c| SOURCE_TO_WORLD[r][c])
}

/// Convert a source-frame vector to the world frame: `B·v`.
#[inline]
pub fn convert_vector(v: &Vec3) -> Vec3 {
    source_to_world() * v
}

/// Convert a source-frame orientation to the world frame: `B·R·Bᵀ`.
pub fn convert_quaternion(q: Quat) -> Quat {
    let b = source_to_world();
    matrix_to_quat(&(b * quat_to_matrix(q) * b.transpose()))
}

/// Reshape a flat `x, y, z, x, y, z, ...` payload into converted points.
/// Trailing values that do not form a whole triplet are dropped.
pub fn convert_points(values: &[f64]) -> Vec<Vec3> {
    let b = source_to_world();
    values
        .chunks_exact(3)
        .map(|c| b * Vec3::new(c[0], c[1], c[2]))
        .collect()
}
