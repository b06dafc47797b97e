//! Frame sinks
//!
//! Plotting happens outside this crate. `JsonLinesSink` streams frames to an
//! external plotter; `LogSink` is the headless fallback.

use super::consumer::{FrameSink, ViewFrame};
use std::io::Write;
use std::time::{Duration, Instant};
use tracing::info;

/// Logs a one-line summary at most once per interval.
#[derive(Debug)]
pub struct LogSink {
    interval: Duration,
    last_logged: Option<Instant>,
}

impl LogSink {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_logged: None,
        }
    }

    fn due(&mut self, now: Instant) -> bool {
        match self.last_logged {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last_logged = Some(now);
                true
            }
        }
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl FrameSink for LogSink {
    fn render(&mut self, frame: &ViewFrame) -> crate::Result<()> {
        if !self.due(Instant::now()) {
            return Ok(());
        }
        for hand in &frame.hands {
            let points = hand.points.as_ref().map_or(0, Vec::len);
            match hand.wrist {
                Some(wrist) => info!(
                    side = %hand.side,
                    points,
                    wrist = format_args!("({:.3}, {:.3}, {:.3})", wrist.x, wrist.y, wrist.z),
                    "hand"
                ),
                None => info!(side = %hand.side, points, "hand (no wrist)"),
            }
        }
        match frame.center {
            Some(center) => info!(
                tick = frame.tick,
                center = format_args!("({:.3}, {:.3}, {:.3})", center.x, center.y, center.z),
                half_extent = format_args!("{:.3}", frame.half_extent),
                "view"
            ),
            None => info!(tick = frame.tick, half_extent = frame.half_extent, "view (waiting for data)"),
        }
        Ok(())
    }
}

/// Writes each frame as one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> FrameSink for JsonLinesSink<W> {
    fn render(&mut self, frame: &ViewFrame) -> crate::Result<()> {
        serde_json::to_writer(&mut self.writer, frame)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
