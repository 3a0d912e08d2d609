//! Geometry used by the plotter: the user to device [`Transform`], chord
//! tessellation of arcs, circles and wedges, and the stroke font labels are
//! drawn with.

mod arc;
mod font;
mod point;
mod scale;
mod text;

pub use arc::{
    Arc, Chord, DEFAULT_CHORD_ANGLE, Degenerate, Wedge, clamp_chord_angle,
};
pub use font::glyph_codes;
pub use point::{DevicePoint, Point};
pub use scale::{Rect, ScaleError, Transform};
pub use text::{
    BODY_WIDTH, CAP_HEIGHT, CELL_ADVANCE, CharSize, Direction, Glyph, Label,
    Stroke,
};
