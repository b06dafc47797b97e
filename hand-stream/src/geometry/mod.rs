//! Geometry module
//!
//! Quaternion and rotation-matrix utilities plus the fixed basis change between
//! the tracking device's coordinate convention and the display convention.
//! Everything here is a pure function over small `Copy` values.

pub mod basis;
pub mod quaternion;

pub use basis::{convert_points, convert_quaternion, convert_vector, source_to_world};
pub use quaternion::{
    matrix_to_quat, normalize, quat_to_matrix, rotate, Mat3, Quat, ShepperdBranch, Vec3,
};
