use log::debug;

use motori_geom::{
    CharSize, DEFAULT_CHORD_ANGLE, DevicePoint, Direction, Point, Rect,
    Transform,
};

use crate::report::Status;
use crate::{HpglError, PlotterOptions};

/// Physical state of the pen.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PenStatus {
    Up,
    Down,
    #[default]
    Unknown,
    /// Lifted by the idle timer; lowered again before the next move.
    Timeout,
}

impl PenStatus {
    #[inline]
    pub fn is_down(self) -> bool {
        self == PenStatus::Down
    }

    /// Whether the last pen instruction asked for the pen to be down.
    #[inline]
    pub fn intends_down(self) -> bool {
        matches!(self, PenStatus::Down | PenStatus::Timeout)
    }

    pub(crate) fn intent(down: bool) -> Self {
        if down { PenStatus::Down } else { PenStatus::Up }
    }
}

/// Sticky error bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorState {
    mask: u8,
    alert_mask: u8,
    last: Option<HpglError>,
}

impl ErrorState {
    pub fn new(alert_mask: u8) -> Self {
        Self {
            mask: 0,
            alert_mask,
            last: None,
        }
    }

    /// Record `err`. Returns whether the alert output should be on.
    pub fn record(&mut self, err: HpglError) -> bool {
        self.mask |= 1 << (err.code() - 1);
        self.last = Some(err);
        self.is_alert()
    }

    /// Report and clear, as `OE` does.
    pub fn take(&mut self) -> Option<HpglError> {
        self.mask = 0;
        self.last.take()
    }

    #[inline]
    pub fn mask(&self) -> u8 {
        self.mask
    }

    #[inline]
    pub fn last(&self) -> Option<HpglError> {
        self.last
    }

    pub fn set_alert_mask(&mut self, alert_mask: u8) -> bool {
        self.alert_mask = alert_mask;
        self.is_alert()
    }

    #[inline]
    pub fn is_alert(&self) -> bool {
        self.mask & self.alert_mask != 0
    }
}

/// Line type from `LT`. Stored and reported, not drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineType {
    pub pattern: f32,
    pub length: Option<f32>,
}

/// Attributes `DF` returns to their defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Attributes {
    pub plot_relative: bool,
    pub chord_angle: f32,
    pub char_size: CharSize,
    pub direction: Direction,
    pub line_type: Option<LineType>,
    pub standard_set: u8,
    pub alternate_set: u8,
    pub use_alternate: bool,
}

impl Attributes {
    pub fn new(options: &PlotterOptions) -> Self {
        let chord_angle = if options.chord_angle > 0.0 {
            options.chord_angle
        } else {
            DEFAULT_CHORD_ANGLE
        };
        Self {
            plot_relative: false,
            chord_angle,
            char_size: CharSize::standard(options.units_per_mm),
            direction: Direction::HORIZONTAL,
            line_type: None,
            standard_set: 0,
            alternate_set: 0,
            use_alternate: false,
        }
    }
}

/// HP-GL graphics state.
#[derive(Debug, Clone)]
pub struct PlotterState {
    /// P1 and P2 in plotter steps.
    pub ip: Rect,
    /// User rectangle while scaling is on.
    pub sc: Option<Rect>,
    pub transform: Transform,
    /// Pen position in user units.
    pub user_loc: Point,
    /// Pen position in plotter steps.
    pub device_loc: DevicePoint,
    pub attributes: Attributes,
    /// Pen thickness in millimetres.
    pub pen_thickness: f32,
    /// Plotting speed in mm/min.
    pub feed_rate: f32,
    /// Acceleration from `AS`, if any.
    pub acceleration: Option<f32>,
    pub pen_number: u8,
    pub errors: ErrorState,
    pub status: Status,
}

impl PlotterState {
    pub const DEFAULT_PEN_THICKNESS: f32 = 0.3;

    pub fn new(options: &PlotterOptions) -> Self {
        Self {
            ip: options.paper.scaling_points(),
            sc: None,
            transform: Transform::identity(),
            user_loc: Point::ORIGIN,
            device_loc: DevicePoint::ORIGIN,
            attributes: Attributes::new(options),
            pen_thickness: Self::DEFAULT_PEN_THICKNESS,
            feed_rate: options.feed_rate,
            acceleration: None,
            pen_number: 1,
            errors: ErrorState::new(options.alert_mask),
            status: Status::INITIALIZED,
        }
    }

    /// `DF`: attributes back to their defaults and scaling off. P1 and P2
    /// are kept.
    pub fn default_attributes(&mut self, options: &PlotterOptions) {
        self.attributes = Attributes::new(options);
        self.set_scaling(None, Transform::identity());
    }

    /// Commit a new scaling and keep the pen where it physically is.
    pub fn set_scaling(&mut self, sc: Option<Rect>, transform: Transform) {
        debug!("[state] scaling {sc:?}");
        self.sc = sc;
        self.transform = transform;
        self.user_loc = transform.to_user(self.device_loc.to_point());
    }

    /// The pen reached `device`, standing for `user`.
    pub fn locate(&mut self, device: DevicePoint, user: Point) {
        self.device_loc = device;
        self.user_loc = user;
    }

    /// Scaling points span, the reference for relative sizes.
    #[inline]
    pub fn ip_span(&self) -> Point {
        self.ip.span()
    }
}
