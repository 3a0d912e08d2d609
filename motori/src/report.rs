//! Bodies of HP-GL output instructions.

use std::fmt;

use bitflags::bitflags;

use motori_geom::{DevicePoint, Rect};

/// Model answered to `OI`.
pub const IDENTIFICATION: &str = "7475A";

bitflags! {
    /// Status byte reported by `OS`.
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Status : u8 {
        const PEN_DOWN      = 0b0000_0001;
        /// P1 or P2 changed since the last `OP`.
        const P1P2_CHANGED  = 0b0000_0010;
        /// Set by `IN` and power on, cleared by `OS`.
        const INITIALIZED   = 0b0000_1000;
        const READY         = 0b0001_0000;
        /// An error is pending, see `OE`.
        const ERROR         = 0b0010_0000;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Report {
    /// `OA` and `OC`: position and pen state.
    Position { x: f32, y: f32, pen_down: bool },
    /// `OE`.
    Error(u8),
    /// `OF`: steps per millimetre on both axes.
    Factors(f32),
    /// `OI`.
    Identification,
    /// `OP`.
    ScalingPoints(Rect),
    /// `OS`.
    Status(Status),
    /// `OW`: hard clip limits.
    Window(DevicePoint),
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Position { x, y, pen_down } => {
                let pen = u8::from(*pen_down);
                write!(f, "{},{},{pen}", Number(*x), Number(*y))
            },
            Report::Error(code) => write!(f, "{code}"),
            Report::Factors(units) => {
                write!(f, "{},{}", Number(*units), Number(*units))
            },
            Report::Identification => f.write_str(IDENTIFICATION),
            Report::ScalingPoints(ip) => write!(
                f,
                "{},{},{},{}",
                Number(ip.min.x),
                Number(ip.min.y),
                Number(ip.max.x),
                Number(ip.max.y)
            ),
            Report::Status(status) => write!(f, "{}", status.bits()),
            Report::Window(limits) => {
                write!(f, "0,0,{},{}", limits.x, limits.y)
            },
        }
    }
}

/// Integers without a fraction, anything else with up to three decimals.
struct Number(f32);

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = (self.0 * 1000.0).round() / 1000.0;
        if rounded.fract() == 0.0 {
            return write!(f, "{}", rounded as i64);
        }

        let text = format!("{rounded:.3}");
        f.write_str(text.trim_end_matches('0'))
    }
}

#[cfg(test)]
mod tests {
    use motori_geom::Point;

    use super::*;

    #[test]
    fn positions() {
        let report = Report::Position {
            x: 603.0,
            y: -521.0,
            pen_down: true,
        };
        assert_eq!(report.to_string(), "603,-521,1");

        let report = Report::Position {
            x: 12.5,
            y: 0.3333,
            pen_down: false,
        };
        assert_eq!(report.to_string(), "12.5,0.333,0");
    }

    #[test]
    fn fixed_reports() {
        assert_eq!(Report::Factors(40.0).to_string(), "40,40");
        assert_eq!(Report::Identification.to_string(), "7475A");
        let window = Report::Window(DevicePoint::new(11040, 7721));
        assert_eq!(window.to_string(), "0,0,11040,7721");
        let ip = Rect::new(Point::new(603.0, 521.0), Point::new(10603.0, 7721.0));
        assert_eq!(Report::ScalingPoints(ip).to_string(), "603,521,10603,7721");
    }

    #[test]
    fn status_byte() {
        let status = Status::PEN_DOWN | Status::READY | Status::INITIALIZED;
        assert_eq!(Report::Status(status).to_string(), "25");
    }
}
