//! View window smoothing
//!
//! Each tick the raw window is fitted to the pooled skeleton points, then
//! blended into the running window with an exponential moving average so the
//! renderer's axes do not jitter.

use crate::geometry::Vec3;
use serde::Serialize;

/// Padding added around the raw extent, as a fraction of it
pub const PADDING_FRACTION: f64 = 0.3;

/// Lower bound on the padding
pub const MIN_PADDING: f64 = 0.02;

/// Lower bound on the padded half-extent
pub const MIN_HALF_EXTENT: f64 = 0.05;

/// Cubic view window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub center: Vec3,
    pub half_extent: f64,
}

impl Bounds {
    /// Padded window enclosing `points`, or `None` if there are none.
    pub fn from_points(points: &[Vec3]) -> Option<Bounds> {
        let (first, rest) = points.split_first()?;
        let (mins, maxs) = rest
            .iter()
            .fold((*first, *first), |(lo, hi), p| (lo.inf(p), hi.sup(p)));

        let center = (mins + maxs) * 0.5;
        let extent = (maxs - mins).max() * 0.5;
        let padding = (extent * PADDING_FRACTION).max(MIN_PADDING);
        Some(Bounds {
            center,
            half_extent: (extent + padding).max(MIN_HALF_EXTENT),
        })
    }

    /// `(min, max)` along x, y and z
    pub fn axis_limits(&self) -> [(f64, f64); 3] {
        let h = self.half_extent;
        [0, 1, 2].map(|axis| (self.center[axis] - h, self.center[axis] + h))
    }
}

/// Exponentially smoothed view window
#[derive(Debug, Clone)]
pub struct BoundsSmoother {
    alpha: f64,
    center: Option<Vec3>,
    half_extent: f64,
}

impl BoundsSmoother {
    /// `alpha` weights the newest sample and must lie in (0, 1].
    pub fn new(alpha: f64, initial_half_extent: f64) -> crate::Result<Self> {
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(crate::Error::Config(format!(
                "alpha must be in (0, 1], got {}",
                alpha
            )));
        }
        Ok(Self {
            alpha,
            center: None,
            half_extent: initial_half_extent,
        })
    }

    /// Blend the window fitted to `points` into the running state.
    ///
    /// The first non-empty update seeds the state. An empty slice leaves it
    /// unchanged.
    pub fn update(&mut self, points: &[Vec3]) -> Option<Bounds> {
        let Some(target) = Bounds::from_points(points) else {
            return self.current();
        };
        match self.center {
            None => {
                self.center = Some(target.center);
                self.half_extent = target.half_extent;
            }
            Some(center) => {
                let a = self.alpha;
                self.center = Some(center * (1.0 - a) + target.center * a);
                self.half_extent = (1.0 - a) * self.half_extent + a * target.half_extent;
            }
        }
        self.current()
    }

    /// Smoothed window, once seeded
    pub fn current(&self) -> Option<Bounds> {
        self.center.map(|center| Bounds {
            center,
            half_extent: self.half_extent,
        })
    }

    /// Smoothed half-extent, or the initial value before seeding
    pub fn half_extent(&self) -> f64 {
        self.half_extent
    }

    pub fn is_seeded(&self) -> bool {
        self.center.is_some()
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pair() -> Vec<Vec3> {
        vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)]
    }

    #[test]
    fn test_from_points_padding() {
        let bounds = Bounds::from_points(&pair()).unwrap();
        assert_relative_eq!(bounds.center, Vec3::new(0.5, 0.0, 0.0));
        // extent 0.5 + padding 0.15
        assert_relative_eq!(bounds.half_extent, 0.65, epsilon = 1e-12);
    }

    #[test]
    fn test_minimum_padding_and_extent() {
        let single = Bounds::from_points(&[Vec3::new(1.0, 2.0, 3.0)]).unwrap();
        assert_relative_eq!(single.half_extent, MIN_HALF_EXTENT);

        let small = Bounds::from_points(&[Vec3::zeros(), Vec3::new(0.0, 0.1, 0.0)]).unwrap();
        // extent 0.05, padding floored at 0.02
        assert_relative_eq!(small.half_extent, 0.07, epsilon = 1e-12);
    }

    #[test]
    fn test_from_points_empty() {
        assert!(Bounds::from_points(&[]).is_none());
    }

    #[test]
    fn test_axis_limits() {
        let bounds = Bounds {
            center: Vec3::new(1.0, -1.0, 0.5),
            half_extent: 0.25,
        };
        let limits = bounds.axis_limits();
        assert_relative_eq!(limits[0].0, 0.75);
        assert_relative_eq!(limits[0].1, 1.25);
        assert_relative_eq!(limits[1].0, -1.25);
        assert_relative_eq!(limits[2].1, 0.75);
    }

    #[test]
    fn test_seed_then_steady() {
        let mut smoother = BoundsSmoother::new(0.1, 0.4).unwrap();
        assert!(smoother.current().is_none());
        assert_relative_eq!(smoother.half_extent(), 0.4);

        let seeded = smoother.update(&pair()).unwrap();
        assert_relative_eq!(seeded.half_extent, 0.65, epsilon = 1e-12);

        let repeated = smoother.update(&pair()).unwrap();
        assert_relative_eq!(repeated.half_extent, 0.65, epsilon = 1e-12);
        assert_relative_eq!(repeated.center, seeded.center, epsilon = 1e-12);

        let empty = smoother.update(&[]).unwrap();
        assert_relative_eq!(empty.half_extent, 0.65, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_before_seed_keeps_initial() {
        let mut smoother = BoundsSmoother::new(0.1, 0.4).unwrap();
        assert!(smoother.update(&[]).is_none());
        assert!(!smoother.is_seeded());
        assert_relative_eq!(smoother.half_extent(), 0.4);
    }

    #[test]
    fn test_ema_moves_toward_target() {
        let mut smoother = BoundsSmoother::new(0.5, 0.4).unwrap();
        smoother.update(&[Vec3::zeros()]);
        let moved = smoother.update(&[Vec3::new(2.0, 0.0, 0.0)]).unwrap();
        assert_relative_eq!(moved.center, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(moved.half_extent, MIN_HALF_EXTENT, epsilon = 1e-12);
    }

    #[test]
    fn test_alpha_one_tracks_exactly() {
        let mut smoother = BoundsSmoother::new(1.0, 0.4).unwrap();
        smoother.update(&pair());
        let next = smoother.update(&[Vec3::new(5.0, 5.0, 5.0)]).unwrap();
        assert_relative_eq!(next.center, Vec3::new(5.0, 5.0, 5.0));
    }

    #[test]
    fn test_invalid_alpha() {
        assert!(BoundsSmoother::new(0.0, 0.4).is_err());
        assert!(BoundsSmoother::new(1.01, 0.4).is_err());
        assert!(BoundsSmoother::new(f64::NAN, 0.4).is_err());
    }
}
