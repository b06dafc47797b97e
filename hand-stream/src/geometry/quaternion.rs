//! Quaternion and Rotation-Matrix Conversions
//!
//! Quaternions use (x, y, z, w) component order everywhere, matching the wire
//! format. Points and matrices are `nalgebra` types.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// 3D point or direction
pub type Vec3 = Vector3<f64>;

/// 3x3 rotation matrix
pub type Mat3 = Matrix3<f64>;

/// Rotation quaternion in (x, y, z, w) order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quat {
    /// The identity rotation
    pub const IDENTITY: Quat = Quat::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Read the first four values as (x, y, z, w).
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        match values {
            [x, y, z, w, ..] => Some(Self::new(*x, *y, *z, *w)),
            _ => None,
        }
    }

    /// Vector part (x, y, z)
    #[inline]
    pub fn vector(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    #[inline]
    pub fn dot(&self, other: &Quat) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    #[inline]
    fn scale(&self, s: f64) -> Quat {
        Quat::new(self.x * s, self.y * s, self.z * s, self.w * s)
    }

    /// True when both quaternions describe the same rotation, i.e. they are
    /// equal up to sign once normalized.
    pub fn same_rotation(&self, other: &Quat, epsilon: f64) -> bool {
        let dot = normalize(*self).dot(&normalize(*other));
        (dot.abs() - 1.0).abs() <= epsilon
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Scale a quaternion to unit length.
///
/// A zero-norm quaternion has no defined rotation and maps to identity. A NaN
/// norm fails the same comparison and maps to identity as well.
pub fn normalize(q: Quat) -> Quat {
    let norm = q.norm();
    if !(norm > 0.0) {
        return Quat::IDENTITY;
    }
    q.scale(1.0 / norm)
}

/// Rotate every point by `q`.
///
/// Uses the two-cross-product form `p' = p + w·t + v × t` with `t = 2·(v × p)`,
/// which avoids building the rotation matrix.
pub fn rotate(points: &[Vec3], q: Quat) -> Vec<Vec3> {
    let q = normalize(q);
    let v = q.vector();
    points
        .iter()
        .map(|p| {
            let t = 2.0 * v.cross(p);
            p + q.w * t + v.cross(&t)
        })
        .collect()
}

/// Convert a quaternion to a rotation matrix (normalizing first).
pub fn quat_to_matrix(q: Quat) -> Mat3 {
    let Quat { x, y, z, w } = normalize(q);
    let (xx, yy, zz) = (x * x, y * y, z * z);
    let (xy, xz, yz) = (x * y, x * z, y * z);
    let (wx, wy, wz) = (w * x, w * y, w * z);

    Matrix3::new(
        1.0 - 2.0 * (yy + zz), 2.0 * (xy - wz), 2.0 * (xz + wy),
        2.0 * (xy + wz), 1.0 - 2.0 * (xx + zz), 2.0 * (yz - wx),
        2.0 * (xz - wy), 2.0 * (yz + wx), 1.0 - 2.0 * (xx + yy),
    )
}

/// Which formula `matrix_to_quat` derives the quaternion from.
///
/// The order is part of the observable behavior: a positive trace always wins,
/// then the largest diagonal entry, with ties going to the earlier axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShepperdBranch {
    /// Trace is positive; `w` is the dominant component
    Trace,
    /// (0,0) is the largest diagonal entry
    X,
    /// (1,1) is the largest remaining diagonal entry
    Y,
    /// (2,2) is the largest diagonal entry
    Z,
}

impl ShepperdBranch {
    /// Pick the numerically stable branch for `m`.
    pub fn select(m: &Mat3) -> Self {
        let (m00, m11, m22) = (m[(0, 0)], m[(1, 1)], m[(2, 2)]);
        if m00 + m11 + m22 > 0.0 {
            ShepperdBranch::Trace
        } else if m00 >= m11 && m00 >= m22 {
            ShepperdBranch::X
        } else if m11 >= m22 {
            ShepperdBranch::Y
        } else {
            ShepperdBranch::Z
        }
    }
}

/// Convert a rotation matrix to a unit quaternion (Shepperd's method).
pub fn matrix_to_quat(m: &Mat3) -> Quat {
    let at = |r: usize, c: usize| m[(r, c)];

    let q = match ShepperdBranch::select(m) {
        ShepperdBranch::Trace => {
            let s = 0.5 / (at(0, 0) + at(1, 1) + at(2, 2) + 1.0).sqrt();
            Quat::new(
                (at(2, 1) - at(1, 2)) * s,
                (at(0, 2) - at(2, 0)) * s,
                (at(1, 0) - at(0, 1)) * s,
                0.25 / s,
            )
        }
        ShepperdBranch::X => {
            let s = 2.0 * (1.0 + at(0, 0) - at(1, 1) - at(2, 2)).sqrt();
            Quat::new(
                0.25 * s,
                (at(0, 1) + at(1, 0)) / s,
                (at(0, 2) + at(2, 0)) / s,
                (at(2, 1) - at(1, 2)) / s,
            )
        }
        ShepperdBranch::Y => {
            let s = 2.0 * (1.0 + at(1, 1) - at(0, 0) - at(2, 2)).sqrt();
            Quat::new(
                (at(0, 1) + at(1, 0)) / s,
                0.25 * s,
                (at(1, 2) + at(2, 1)) / s,
                (at(0, 2) - at(2, 0)) / s,
            )
        }
        ShepperdBranch::Z => {
            let s = 2.0 * (1.0 + at(2, 2) - at(0, 0) - at(1, 1)).sqrt();
            Quat::new(
                (at(0, 2) + at(2, 0)) / s,
                (at(1, 2) + at(2, 1)) / s,
                0.25 * s,
                (at(1, 0) - at(0, 1)) / s,
            )
        }
    };

    normalize(q)
}
