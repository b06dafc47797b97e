//! View loop
//!
//! The foreground consumer. Each tick it reads the active hands from the
//! store, keeps the last known points per hand so the window does not
//! collapse while a hand is briefly missing, smooths the window and hands a
//! `ViewFrame` to the renderer.

use super::bounds::{Bounds, BoundsSmoother};
use crate::app::config::ViewConfig;
use crate::geometry::Vec3;
use crate::hand::{finger_segments, HandStateStore, Segment, Side};
use crate::stream::StopToken;
use crate::time::Timestamp;
use serde::Serialize;
use std::thread;
use std::time::Instant;
use tracing::{debug, info};

/// One hand as seen by the renderer
#[derive(Debug, Clone, Serialize)]
pub struct HandFrame {
    pub side: Side,
    /// World-space landmarks from this tick, if the hand has data
    pub points: Option<Vec<Vec3>>,
    pub wrist: Option<Vec3>,
    /// Finger bones, when enabled and both points and wrist are known
    pub segments: Option<Vec<Segment>>,
}

impl HandFrame {
    pub fn has_data(&self) -> bool {
        self.points.is_some() || self.wrist.is_some()
    }
}

/// Everything the renderer needs for one tick
#[derive(Debug, Clone, Serialize)]
pub struct ViewFrame {
    pub tick: u64,
    pub timestamp: Timestamp,
    /// Active hands, in `Side::ALL` order
    pub hands: Vec<HandFrame>,
    /// Smoothed center; absent until the first points arrive
    pub center: Option<Vec3>,
    /// Smoothed half-extent, or the configured initial value before any data
    pub half_extent: f64,
    pub axis_limits: Option<[(f64, f64); 3]>,
}

impl ViewFrame {
    pub fn hand(&self, side: Side) -> Option<&HandFrame> {
        self.hands.iter().find(|hand| hand.side == side)
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.center.map(|center| Bounds {
            center,
            half_extent: self.half_extent,
        })
    }
}

/// Renderer boundary
pub trait FrameSink {
    /// Draw one frame. Hands without data are still present in `frame`.
    fn render(&mut self, frame: &ViewFrame) -> crate::Result<()>;
}

/// Consumer-owned state carried between ticks
#[derive(Debug)]
pub struct ViewState {
    sides: Vec<Side>,
    show_fingers: bool,
    smoother: BoundsSmoother,
    cached_points: [Option<Vec<Vec3>>; 2],
    ticks: u64,
}

impl ViewState {
    pub fn new(config: &ViewConfig) -> crate::Result<Self> {
        let sides: Vec<Side> = Side::ALL
            .into_iter()
            .filter(|side| match side {
                Side::Left => config.show_left,
                Side::Right => config.show_right,
            })
            .collect();
        if sides.is_empty() {
            return Err(crate::Error::Config("no hand side enabled".to_string()));
        }

        Ok(Self {
            sides,
            show_fingers: config.show_fingers,
            smoother: BoundsSmoother::new(config.alpha, config.initial_half_extent)?,
            cached_points: [None, None],
            ticks: 0,
        })
    }

    /// Sides this view tracks
    pub fn sides(&self) -> &[Side] {
        &self.sides
    }

    /// Read the store once and produce the next frame.
    pub fn tick(&mut self, store: &HandStateStore) -> ViewFrame {
        let mut hands = Vec::with_capacity(self.sides.len());
        for &side in &self.sides {
            let points = store.world_points(side);
            let wrist = store.wrist_point(side);
            if let Some(points) = &points {
                self.cached_points[side.index()] = Some(points.clone());
            }

            let segments = match (&points, &wrist) {
                (Some(points), Some(wrist)) if self.show_fingers => finger_segments(wrist, points),
                _ => None,
            };
            hands.push(HandFrame {
                side,
                points,
                wrist,
                segments,
            });
        }

        let pooled: Vec<Vec3> = self
            .sides
            .iter()
            .filter_map(|side| self.cached_points[side.index()].as_deref())
            .flatten()
            .copied()
            .collect();
        let bounds = self.smoother.update(&pooled);

        self.ticks += 1;
        ViewFrame {
            tick: self.ticks,
            timestamp: Timestamp::now(),
            hands,
            center: bounds.map(|b| b.center),
            half_extent: self.smoother.half_extent(),
            axis_limits: bounds.map(|b| b.axis_limits()),
        }
    }

    /// Frames produced so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Tick at `config.tick_interval_ms` until `stop` is cancelled or `deadline`
/// passes. Returns the number of frames rendered.
///
/// A sink error ends the loop and is returned.
pub fn run_view_loop<S: FrameSink + ?Sized>(
    store: &HandStateStore,
    stop: &StopToken,
    config: &ViewConfig,
    sink: &mut S,
    deadline: Option<Instant>,
) -> crate::Result<u64> {
    let mut state = ViewState::new(config)?;
    let interval = config.tick_interval();
    info!(sides = ?state.sides(), ?interval, "View loop started");

    while !stop.is_cancelled() {
        let started = Instant::now();
        if deadline.is_some_and(|deadline| started >= deadline) {
            debug!("View loop reached its deadline");
            break;
        }

        let frame = state.tick(store);
        sink.render(&frame)?;

        thread::sleep(interval.saturating_sub(started.elapsed()));
    }

    info!(frames = state.ticks(), "View loop stopped");
    Ok(state.ticks())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const WRIST_ORIGIN: [f64; 7] = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0];

    fn hand_landmarks(rows: usize) -> Vec<f64> {
        (0..rows).flat_map(|i| [0.0, 0.0, i as f64 * 0.01]).collect()
    }

    #[derive(Default)]
    struct Collect(Vec<ViewFrame>);

    impl FrameSink for Collect {
        fn render(&mut self, frame: &ViewFrame) -> crate::Result<()> {
            self.0.push(frame.clone());
            Ok(())
        }
    }

    #[test]
    fn test_empty_store_reports_initial_extent() {
        let store = HandStateStore::new();
        let mut state = ViewState::new(&ViewConfig::default()).unwrap();

        let frame = state.tick(&store);
        assert_eq!(frame.hands.len(), 2);
        assert!(frame.hands.iter().all(|hand| !hand.has_data()));
        assert!(frame.center.is_none());
        assert!(frame.axis_limits.is_none());
        assert_relative_eq!(frame.half_extent, 0.4);
    }

    #[test]
    fn test_only_active_sides_reported() {
        let config = ViewConfig {
            show_left: false,
            ..ViewConfig::default()
        };
        let store = HandStateStore::new();
        store.update_landmarks(Side::Left, &[1.0, 2.0, 3.0]);

        let mut state = ViewState::new(&config).unwrap();
        let frame = state.tick(&store);
        assert_eq!(frame.hands.len(), 1);
        assert!(frame.hand(Side::Left).is_none());
        // Inactive hand does not contribute to the window
        assert!(frame.center.is_none());
    }

    #[test]
    fn test_no_sides_rejected() {
        let config = ViewConfig {
            show_left: false,
            show_right: false,
            ..ViewConfig::default()
        };
        assert!(ViewState::new(&config).is_err());
    }

    #[test]
    fn test_segments_need_wrist_and_toggle() {
        let store = HandStateStore::new();
        store.update_landmarks(Side::Right, &hand_landmarks(21));

        let config = ViewConfig {
            show_fingers: true,
            ..ViewConfig::default()
        };
        let mut state = ViewState::new(&config).unwrap();
        let frame = state.tick(&store);
        assert!(frame.hand(Side::Right).unwrap().segments.is_none());

        store.update_wrist(Side::Right, &WRIST_ORIGIN);
        let frame = state.tick(&store);
        let segments = frame.hand(Side::Right).unwrap().segments.as_ref().unwrap();
        assert_eq!(segments.len(), 20);

        let mut plain = ViewState::new(&ViewConfig::default()).unwrap();
        assert!(plain.tick(&store).hand(Side::Right).unwrap().segments.is_none());
    }

    #[test]
    fn test_bounds_seeded_from_points() {
        let store = HandStateStore::new();
        store.update_wrist(Side::Right, &WRIST_ORIGIN);
        // Source x maps to world -y
        store.update_landmarks(Side::Right, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

        let mut state = ViewState::new(&ViewConfig::default()).unwrap();
        let frame = state.tick(&store);
        let center = frame.center.unwrap();
        assert_relative_eq!(center, Vec3::new(0.0, -0.5, 0.0), epsilon = 1e-12);
        assert_relative_eq!(frame.half_extent, 0.65, epsilon = 1e-12);

        let limits = frame.axis_limits.unwrap();
        assert_relative_eq!(limits[1].0, -1.15, epsilon = 1e-12);
        assert_relative_eq!(limits[1].1, 0.15, epsilon = 1e-12);
    }

    #[test]
    fn test_run_view_loop_until_deadline() {
        let store = HandStateStore::new();
        store.update_landmarks(Side::Left, &[0.0, 0.0, 0.0]);
        let config = ViewConfig {
            tick_interval_ms: 1,
            ..ViewConfig::default()
        };
        let mut sink = Collect::default();
        let deadline = Instant::now() + std::time::Duration::from_millis(30);

        let frames = run_view_loop(&store, &StopToken::new(), &config, &mut sink, Some(deadline)).unwrap();
        assert!(frames > 0);
        assert_eq!(frames as usize, sink.0.len());
        assert_eq!(sink.0[0].tick, 1);
    }

    #[test]
    fn test_run_view_loop_stops_when_cancelled() {
        let store = HandStateStore::new();
        let stop = StopToken::new();
        stop.cancel();
        let mut sink = Collect::default();

        let frames = run_view_loop(&store, &stop, &ViewConfig::default(), &mut sink, None).unwrap();
        assert_eq!(frames, 0);
        assert!(sink.0.is_empty());
    }
}
