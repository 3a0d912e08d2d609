//! Work queued by a command and executed a few steps per poll.

use motori_geom::{Arc, Glyph, Point, Wedge};

use crate::PenStatus;

/// Where a move goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Target {
    /// User units, through the current scaling.
    User(Point),
    /// Plotter steps, used by labels and parking.
    Device(Point),
}

/// Shapes handing out one move at a time.
#[derive(Debug, Clone)]
pub(crate) enum Trace {
    Arc(Arc),
    Wedge(Wedge),
    Glyph(Glyph),
}

impl Trace {
    /// Next move and the pen it needs, `None` when the shape is finished.
    pub(crate) fn next_move(
        &mut self,
    ) -> Option<(Target, Option<PenStatus>)> {
        match self {
            Trace::Arc(arc) => {
                arc.next().map(|point| (Target::User(point), None))
            },
            Trace::Wedge(wedge) => {
                wedge.next().map(|point| (Target::User(point), None))
            },
            Trace::Glyph(glyph) => glyph.next().map(|stroke| {
                let pen = PenStatus::intent(stroke.pen);
                (Target::Device(stroke.point), Some(pen))
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Step {
    Pen(PenStatus),
    Move(Target),
    Trace(Trace),
    /// Take `Point` as the user position without moving.
    Locate(Point),
    /// Pen carousel.
    Select(u8),
    Home,
}

#[cfg(test)]
mod tests {
    use motori_geom::{CharSize, Direction, Label};

    use super::*;

    #[test]
    fn arc_trace_moves_in_user_units() {
        let arc =
            Arc::new(Point::ORIGIN, Point::new(10.0, 0.0), 90.0, 90.0).unwrap();
        let mut trace = Trace::Arc(arc);
        let Some((Target::User(point), None)) = trace.next_move() else {
            panic!("arc did not produce a user move");
        };
        assert!((point.x).abs() < 1e-4 && (point.y - 10.0).abs() < 1e-4);
        assert!(trace.next_move().is_none());
    }

    #[test]
    fn glyph_trace_carries_the_pen() {
        let size = CharSize {
            width: 4.0,
            height: 6.0,
        };
        let mut label =
            Label::begin(Point::ORIGIN, size, Direction::HORIZONTAL);
        let mut trace = Trace::Glyph(label.glyph(b'L'));
        let pens: Vec<Option<PenStatus>> = std::iter::from_fn(|| trace.next_move())
            .map(|(_, pen)| pen)
            .collect();
        assert_eq!(
            pens,
            vec![
                Some(PenStatus::Up),
                Some(PenStatus::Down),
                Some(PenStatus::Down),
                Some(PenStatus::Up),
            ]
        );
    }
}
