//! Per-hand live state
//!
//! Each `HandState` holds two independently published field groups: the wrist
//! pose and the local landmark array. The receiver replaces a group wholesale
//! on every matching record; readers take a copy of one group at a time.
//!
//! A reader may see new landmarks combined with the previous pose (or the
//! reverse). Only the latest sample is ever displayed, so this is accepted.

use super::types::Side;
use crate::geometry::{convert_points, convert_quaternion, convert_vector, rotate, Quat, Vec3};
use crate::time::timebase::Timestamp;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Minimum wrist payload: position (3) + orientation (4)
pub const WRIST_FIELDS: usize = 7;

/// Minimum landmark payload: one point
pub const LANDMARK_FIELDS: usize = 3;

/// Wrist transform in the world frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pose {
    pub position: Vec3,
    /// Always unit-norm
    pub orientation: Quat,
}

impl Pose {
    /// Build a world-frame pose from a source-frame wrist payload
    /// (`px, py, pz, qx, qy, qz, qw`). Values past the seventh are ignored.
    pub fn from_wire(values: &[f64]) -> Option<Pose> {
        if values.len() < WRIST_FIELDS {
            return None;
        }
        let position = Vec3::new(values[0], values[1], values[2]);
        let orientation = Quat::from_slice(&values[3..WRIST_FIELDS])?;

        Some(Pose {
            position: convert_vector(&position),
            orientation: convert_quaternion(orientation),
        })
    }

    /// Map wrist-local points into the world frame.
    pub fn transform(&self, local: &[Vec3]) -> Vec<Vec3> {
        let mut points = rotate(local, self.orientation);
        for p in &mut points {
            *p += self.position;
        }
        points
    }
}

/// Live state of one hand
#[derive(Debug)]
pub struct HandState {
    side: Side,
    pose: RwLock<Option<Pose>>,
    landmarks_local: RwLock<Option<Arc<[Vec3]>>>,
    /// Nanoseconds since the timebase epoch
    last_update: AtomicU64,
}

impl HandState {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            pose: RwLock::new(None),
            landmarks_local: RwLock::new(None),
            last_update: AtomicU64::new(Timestamp::now().as_nanos()),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Replace the pose from a source-frame wrist payload.
    ///
    /// Returns false, leaving the previous pose in place, when fewer than
    /// seven values are given.
    pub fn update_wrist(&self, values: &[f64]) -> bool {
        let Some(pose) = Pose::from_wire(values) else {
            return false;
        };
        *self.pose.write() = Some(pose);
        self.touch();
        true
    }

    /// Replace the local landmarks from a flat source-frame payload.
    ///
    /// The payload is truncated to whole triplets. Returns false, leaving the
    /// previous landmarks in place, when it holds no complete point.
    pub fn update_landmarks(&self, values: &[f64]) -> bool {
        if values.len() < LANDMARK_FIELDS {
            return false;
        }
        let points: Arc<[Vec3]> = convert_points(values).into();
        *self.landmarks_local.write() = Some(points);
        self.touch();
        true
    }

    /// Latest wrist pose
    pub fn pose(&self) -> Option<Pose> {
        *self.pose.read()
    }

    /// Latest landmarks in the wrist-local (world-axis) frame
    pub fn landmarks_local(&self) -> Option<Arc<[Vec3]>> {
        self.landmarks_local.read().clone()
    }

    /// Landmarks placed in the world by the wrist pose.
    ///
    /// Without a pose the local landmarks are returned unchanged.
    pub fn world_points(&self) -> Option<Vec<Vec3>> {
        let local = self.landmarks_local()?;
        match self.pose() {
            Some(pose) => Some(pose.transform(&local)),
            None => Some(local.to_vec()),
        }
    }

    /// World position of the wrist, if a pose has arrived
    pub fn wrist_point(&self) -> Option<Vec3> {
        self.pose().map(|pose| pose.position)
    }

    /// When either field group was last replaced (creation time before that)
    pub fn last_update(&self) -> Timestamp {
        Timestamp::from_nanos(self.last_update.load(Ordering::Acquire))
    }

    /// Time since the last update
    pub fn age(&self) -> Duration {
        self.last_update().elapsed()
    }

    fn touch(&self) {
        self.last_update
            .store(Timestamp::now().as_nanos(), Ordering::Release);
    }
}
