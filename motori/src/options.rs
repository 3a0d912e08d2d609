use std::time::Duration;

use serde::{Deserialize, Serialize};

use motori_escape::{Handshake, OutputMode};
use motori_geom::{DevicePoint, Point, Rect};

use crate::Result;

/// Media the plotter is set up for.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Paper {
    #[default]
    A4,
    A3,
}

impl Paper {
    /// Largest reachable position in plotter steps.
    pub fn limits(self) -> DevicePoint {
        match self {
            Paper::A4 => DevicePoint::new(11040, 7721),
            Paper::A3 => DevicePoint::new(16158, 11040),
        }
    }

    /// P1 and P2 after `IN`.
    pub fn scaling_points(self) -> Rect {
        let (p1, p2) = match self {
            Paper::A4 => ((603.0, 521.0), (10603.0, 7721.0)),
            Paper::A3 => ((170.0, 602.0), (15370.0, 10602.0)),
        };
        Rect::new(Point::new(p1.0, p1.1), Point::new(p2.0, p2.1))
    }
}

/// Configuration knobs of a plotter session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotterOptions {
    pub paper: Paper,
    /// Plotter steps per millimetre.
    pub units_per_mm: f32,
    /// Chord angle for arcs that leave it out, in degrees.
    pub chord_angle: f32,
    /// Plotting speed in mm/min until `VS` overrides it.
    pub feed_rate: f32,
    pub pen_down_delay_ms: u64,
    pub pen_lift_delay_ms: u64,
    /// A lowered pen is lifted after this long without motion.
    pub pen_idle_timeout_ms: u64,
    pub low_water: usize,
    pub high_water: usize,
    pub block_size: usize,
    /// Appended to every output line.
    pub line_terminator: String,
    /// Queued steps executed by a single poll.
    pub steps_per_poll: usize,
    /// Run a homing cycle when the session starts.
    pub home_on_start: bool,
    /// Errors that raise the alert output after `IN`.
    pub alert_mask: u8,
}

impl Default for PlotterOptions {
    fn default() -> Self {
        Self {
            paper: Paper::A4,
            units_per_mm: 40.0,
            chord_angle: 5.0,
            feed_rate: 1000.0,
            pen_down_delay_ms: 20,
            pen_lift_delay_ms: 50,
            pen_idle_timeout_ms: 55_000,
            low_water: 200,
            high_water: 600,
            block_size: 80,
            line_terminator: String::from("\r\n"),
            steps_per_poll: 32,
            home_on_start: true,
            alert_mask: 223,
        }
    }
}

impl PlotterOptions {
    /// Parse options from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn handshake(&self) -> Handshake {
        Handshake::new(self.low_water, self.high_water, self.block_size)
    }

    pub fn output_mode(&self) -> OutputMode {
        OutputMode::with_terminator(self.line_terminator.as_bytes())
    }

    #[inline]
    pub fn pen_delay(&self, down: bool) -> Duration {
        let ms = if down {
            self.pen_down_delay_ms
        } else {
            self.pen_lift_delay_ms
        };
        Duration::from_millis(ms)
    }

    #[inline]
    pub fn pen_idle_timeout(&self) -> Duration {
        Duration::from_millis(self.pen_idle_timeout_ms)
    }
}
