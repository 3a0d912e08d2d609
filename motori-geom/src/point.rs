use std::ops::{Add, Mul, Sub};

/// Point in floating coordinates, user or device units depending on context.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point::new(0.0, 0.0);

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Round to the nearest device step.
    pub fn round(self) -> DevicePoint {
        DevicePoint::new(self.x.round() as i32, self.y.round() as i32)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point {
    type Output = Point;

    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Position in plotter steps.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DevicePoint {
    pub x: i32,
    pub y: i32,
}

impl DevicePoint {
    pub const ORIGIN: DevicePoint = DevicePoint::new(0, 0);

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn to_point(self) -> Point {
        Point::new(self.x as f32, self.y as f32)
    }

    /// Whether both axes fit the signed 16-bit plotter range.
    pub fn in_range(self) -> bool {
        let range = -(i16::MAX as i32)..=i16::MAX as i32;
        range.contains(&self.x) && range.contains(&self.y)
    }
}

impl From<DevicePoint> for Point {
    fn from(point: DevicePoint) -> Self {
        point.to_point()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(Point::new(1.5, -1.5).round(), DevicePoint::new(2, -2));
        assert_eq!(Point::new(0.49, 0.51).round(), DevicePoint::new(0, 1));
    }

    #[test]
    fn device_range() {
        assert!(DevicePoint::new(32767, -32767).in_range());
        assert!(!DevicePoint::new(32768, 0).in_range());
        assert!(!DevicePoint::new(0, -40000).in_range());
    }

    #[test]
    fn arithmetic() {
        let p = Point::new(3.0, 4.0);
        assert_eq!(p + p, Point::new(6.0, 8.0));
        assert_eq!(p - p, Point::ORIGIN);
        assert_eq!(p * 2.0, Point::new(6.0, 8.0));
        assert_eq!(p.distance(Point::ORIGIN), 5.0);
    }
}
