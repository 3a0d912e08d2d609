use log::debug;
use thiserror::Error;

use crate::{DevicePoint, Point};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ScaleError {
    #[error("scaling rectangle has a zero span")]
    Degenerate,
}

/// Axis aligned rectangle given by two corners.
///
/// `min` and `max` are the first and second corner as the instruction named
/// them; `max` may lie below or left of `min`, which mirrors the axis.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub const fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn span(&self) -> Point {
        self.max - self.min
    }

    fn is_degenerate(&self) -> bool {
        let span = self.span();
        let usable = |v: f32| v != 0.0 && v.is_finite();
        !(usable(span.x) && usable(span.y))
    }
}

/// Mapping between user units and plotter steps.
///
/// `device = user * scale + translate`, per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    scale: Point,
    translate: Point,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub const fn identity() -> Self {
        Self {
            scale: Point::new(1.0, 1.0),
            translate: Point::new(0.0, 0.0),
        }
    }

    /// Map the user rectangle `sc` onto the device rectangle `ip` (P1, P2).
    pub fn from_rects(ip: Rect, sc: Rect) -> Result<Self, ScaleError> {
        if ip.is_degenerate() || sc.is_degenerate() {
            return Err(ScaleError::Degenerate);
        }

        let (ip_span, sc_span) = (ip.span(), sc.span());
        let scale = Point::new(ip_span.x / sc_span.x, ip_span.y / sc_span.y);
        let translate = Point::new(
            ip.min.x - sc.min.x * scale.x,
            ip.min.y - sc.min.y * scale.y,
        );

        debug!("[scale] scale {scale:?}, translate {translate:?}");
        Ok(Self { scale, translate })
    }

    #[inline]
    pub fn scale(&self) -> Point {
        self.scale
    }

    #[inline]
    pub fn translate(&self) -> Point {
        self.translate
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    pub fn to_device(&self, user: Point) -> Point {
        Point::new(
            user.x * self.scale.x + self.translate.x,
            user.y * self.scale.y + self.translate.y,
        )
    }

    pub fn to_user(&self, device: Point) -> Point {
        Point::new(
            (device.x - self.translate.x) / self.scale.x,
            (device.y - self.translate.y) / self.scale.y,
        )
    }

    /// Device position reached by moving `delta` user units from `reference`.
    pub fn to_device_relative(&self, reference: Point, delta: Point) -> Point {
        self.to_device(reference + delta)
    }

    /// User position reached by moving `delta` steps from `reference`.
    pub fn to_user_relative(&self, reference: Point, delta: Point) -> Point {
        self.to_user(self.to_device(reference) + delta)
    }

    /// Round `user` to the nearest plotter step and return that step together
    /// with the user position it really stands for.
    pub fn quantize(&self, user: Point) -> (DevicePoint, Point) {
        let device = self.to_device(user).round();
        (device, self.to_user(device.to_point()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    fn plotter() -> Transform {
        let ip = Rect::new(Point::new(603.0, 521.0), Point::new(10603.0, 7721.0));
        let sc = Rect::new(Point::new(0.0, 0.0), Point::new(100.0, 72.0));
        Transform::from_rects(ip, sc).unwrap()
    }

    #[test]
    fn identity_by_default() {
        let transform = Transform::default();
        assert!(transform.is_identity());
        let p = Point::new(12.5, -3.0);
        assert_eq!(transform.to_device(p), p);
        assert_eq!(transform.quantize(p), (DevicePoint::new(13, -3), Point::new(13.0, -3.0)));
    }

    #[test]
    fn user_rectangle_maps_onto_p1_p2() {
        let transform = plotter();
        assert!(close(transform.to_device(Point::ORIGIN), Point::new(603.0, 521.0)));
        assert!(close(
            transform.to_device(Point::new(100.0, 72.0)),
            Point::new(10603.0, 7721.0)
        ));
        assert_eq!(transform.scale(), Point::new(100.0, 100.0));
    }

    #[test]
    fn round_trip() {
        let transform = plotter();
        for user in [Point::new(1.25, 7.5), Point::new(-40.0, 300.0), Point::new(99.0, 0.01)] {
            let back = transform.to_user(transform.to_device(user));
            assert!(close(back, user), "{user:?} -> {back:?}");
        }
    }

    #[test]
    fn mirrored_axes_are_allowed() {
        let ip = Rect::new(Point::new(0.0, 0.0), Point::new(1000.0, 1000.0));
        let sc = Rect::new(Point::new(10.0, 10.0), Point::new(0.0, 0.0));
        let transform = Transform::from_rects(ip, sc).unwrap();
        assert!(close(transform.to_device(Point::new(10.0, 10.0)), Point::ORIGIN));
        assert!(close(transform.to_device(Point::ORIGIN), Point::new(1000.0, 1000.0)));
    }

    #[test]
    fn zero_span_is_rejected() {
        let ip = Rect::new(Point::ORIGIN, Point::new(1000.0, 1000.0));
        let flat = Rect::new(Point::new(5.0, 0.0), Point::new(5.0, 10.0));
        assert_eq!(Transform::from_rects(ip, flat), Err(ScaleError::Degenerate));
        assert_eq!(Transform::from_rects(flat, ip), Err(ScaleError::Degenerate));
    }

    #[test]
    fn quantize_snaps_to_steps() {
        let ip = Rect::new(Point::ORIGIN, Point::new(1000.0, 1000.0));
        let sc = Rect::new(Point::ORIGIN, Point::new(3.0, 3.0));
        let transform = Transform::from_rects(ip, sc).unwrap();
        let (device, user) = transform.quantize(Point::new(1.0, 2.0));
        assert_eq!(device, DevicePoint::new(333, 667));
        assert!(close(user, Point::new(0.999, 2.001)));
    }

    #[test]
    fn relative_moves() {
        let transform = plotter();
        let reference = Point::new(10.0, 10.0);
        assert!(close(
            transform.to_device_relative(reference, Point::new(1.0, -1.0)),
            Point::new(1703.0, 1421.0)
        ));
        assert!(close(
            transform.to_user_relative(reference, Point::new(100.0, 100.0)),
            Point::new(11.0, 11.0)
        ));
    }
}
