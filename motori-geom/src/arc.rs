//! Chord tessellation of arcs, circles and wedges.
//!
//! Angles are given in degrees the way HP-GL passes them and converted to
//! radians once, when the shape is created. Every shape is a small state
//! machine handing out one chord endpoint per call, so the plotter can
//! interleave tessellation with the rest of its work.

use std::f32::consts::TAU;

use log::trace;
use thiserror::Error;

use crate::Point;

/// Chord angle used when an instruction leaves it out, in degrees.
pub const DEFAULT_CHORD_ANGLE: f32 = 5.0;

const MIN_CHORD_ANGLE: f32 = 0.5;
const MAX_CHORD_ANGLE: f32 = 180.0;

/// Keeps step counts finite when the sweep is an exact multiple of the step.
const STEP_EPSILON: f32 = 1e-4;

/// The shape has a zero sweep, a zero radius or a zero chord angle.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("arc is degenerate")]
pub struct Degenerate;

/// Clamp a chord angle to the range plotters honour, ignoring its sign.
pub fn clamp_chord_angle(degrees: f32) -> f32 {
    if degrees.is_nan() {
        return DEFAULT_CHORD_ANGLE;
    }
    degrees.abs().clamp(MIN_CHORD_ANGLE, MAX_CHORD_ANGLE)
}

/// One chord endpoint. `more` is false on the last one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chord {
    pub point: Point,
    pub more: bool,
}

#[derive(Debug, Clone)]
pub struct Arc {
    center: Point,
    radius: f32,
    start: f32,
    sweep: f32,
    step: f32,
    steps: u32,
    taken: u32,
}

impl Arc {
    /// Arc around `center` starting at `start` and sweeping `total` degrees
    /// (counter-clockwise when positive) in chords of `step` degrees.
    pub fn new(
        center: Point,
        start: Point,
        total: f32,
        step: f32,
    ) -> Result<Self, Degenerate> {
        let radius = start.distance(center);
        if total == 0.0 || step == 0.0 || radius == 0.0 {
            return Err(Degenerate);
        }
        if !(total.is_finite() && step.is_finite() && radius.is_finite()) {
            return Err(Degenerate);
        }

        let sweep = total.to_radians();
        let step = step.abs().to_radians().copysign(sweep);
        let steps = ((sweep / step) - STEP_EPSILON).ceil().max(1.0) as u32;

        let mut start = (start.y - center.y).atan2(start.x - center.x);
        if start < 0.0 {
            start += TAU;
        }

        trace!(
            "[arc] center {center:?} r={radius} a0={} sweep={total} in {steps} steps",
            start.to_degrees()
        );

        Ok(Self {
            center,
            radius,
            start,
            sweep,
            step,
            steps,
            taken: 0,
        })
    }

    /// Full turn starting at `center + (radius, 0)`.
    pub fn circle(
        center: Point,
        radius: f32,
        step: f32,
    ) -> Result<Self, Degenerate> {
        Self::new(center, center + Point::new(radius, 0.0), 360.0, step)
    }

    #[inline]
    pub fn center(&self) -> Point {
        self.center
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// First point of the arc.
    pub fn start(&self) -> Point {
        self.at(0.0)
    }

    /// Last point of the arc.
    pub fn end(&self) -> Point {
        self.at(self.sweep)
    }

    /// Next chord endpoint. Past the end this keeps returning the last point
    /// with `more == false`.
    pub fn next_chord(&mut self) -> Chord {
        if self.taken >= self.steps {
            return Chord {
                point: self.end(),
                more: false,
            };
        }

        self.taken += 1;
        let angle = if self.taken == self.steps {
            self.sweep
        } else {
            self.taken as f32 * self.step
        };

        Chord {
            point: self.at(angle),
            more: self.taken < self.steps,
        }
    }

    pub fn is_done(&self) -> bool {
        self.taken >= self.steps
    }

    fn at(&self, angle: f32) -> Point {
        let (sin, cos) = (self.start + angle).sin_cos();
        self.center + Point::new(cos, sin) * self.radius
    }
}

impl Iterator for Arc {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.is_done() {
            return None;
        }
        Some(self.next_chord().point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.steps - self.taken) as usize;
        (left, Some(left))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Leading,
    Body,
    Trailing,
    Done,
}

/// Pie slice: a radius out to the arc, the arc, and a radius back.
#[derive(Debug, Clone)]
pub struct Wedge {
    arc: Arc,
    phase: Phase,
}

impl Wedge {
    /// Wedge of `radius` around `center`, starting at `start` degrees from
    /// the X axis and sweeping `sweep` degrees.
    pub fn new(
        center: Point,
        radius: f32,
        start: f32,
        sweep: f32,
        step: f32,
    ) -> Result<Self, Degenerate> {
        let (sin, cos) = start.to_radians().sin_cos();
        let rim = center + Point::new(cos, sin) * radius;
        let arc = Arc::new(center, rim, sweep, step)?;

        Ok(Self {
            arc,
            phase: Phase::Leading,
        })
    }

    #[inline]
    pub fn center(&self) -> Point {
        self.arc.center()
    }

    pub fn next_chord(&mut self) -> Chord {
        let point = match self.phase {
            Phase::Leading => {
                self.phase = Phase::Body;
                self.arc.start()
            },
            Phase::Body => {
                let chord = self.arc.next_chord();
                if !chord.more {
                    self.phase = Phase::Trailing;
                }
                chord.point
            },
            Phase::Trailing | Phase::Done => {
                self.phase = Phase::Done;
                self.arc.center()
            },
        };

        Chord {
            point,
            more: self.phase != Phase::Done,
        }
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }
}

impl Iterator for Wedge {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.is_done() {
            return None;
        }
        Some(self.next_chord().point)
    }
}
