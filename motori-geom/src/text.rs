//! Label layout in plotter steps.
//!
//! A [`Label`] tracks the character origin and the start of the current
//! line. Each byte becomes a [`Glyph`], an iterator of pen strokes that ends
//! with a pen-up move to the next character origin. Sizes are absolute, so
//! all geometry here is in device units and independent of user scaling.

use log::debug;

use crate::Point;
use crate::font::{self, BASELINE};

/// Width of a capital letter, in grid units.
pub const BODY_WIDTH: f32 = 4.0;
/// Height of a capital letter above the baseline, in grid units.
pub const CAP_HEIGHT: f32 = 6.0;
/// Distance between character origins, in grid units.
pub const CELL_ADVANCE: f32 = 6.0;

/// Lines are twice the cap height apart.
const LINE_SPACING: f32 = 2.0;

/// Character body size in plotter steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharSize {
    pub width: f32,
    pub height: f32,
}

impl CharSize {
    /// Size after `IN`/`DF`: 0.19 cm wide, 0.27 cm tall.
    pub const STANDARD_CM: (f32, f32) = (0.19, 0.27);

    pub fn from_cm(width: f32, height: f32, units_per_mm: f32) -> Self {
        Self {
            width: width * 10.0 * units_per_mm,
            height: height * 10.0 * units_per_mm,
        }
    }

    /// Size as a percentage of the P1 to P2 distance.
    pub fn relative(width: f32, height: f32, span: Point) -> Self {
        Self {
            width: width / 100.0 * span.x,
            height: height / 100.0 * span.y,
        }
    }

    pub fn standard(units_per_mm: f32) -> Self {
        let (width, height) = Self::STANDARD_CM;
        Self::from_cm(width, height, units_per_mm)
    }

    /// Size of one font grid unit.
    fn grid(&self) -> Point {
        Point::new(self.width / BODY_WIDTH, self.height / CAP_HEIGHT)
    }
}

/// Baseline direction as a unit vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction {
    cos: f32,
    sin: f32,
}

impl Default for Direction {
    fn default() -> Self {
        Self::HORIZONTAL
    }
}

impl Direction {
    pub const HORIZONTAL: Direction = Direction { cos: 1.0, sin: 0.0 };

    /// Direction of the vector `(run, rise)`, `None` when both are zero.
    pub fn new(run: f32, rise: f32) -> Option<Self> {
        let len = run.hypot(rise);
        if len == 0.0 || !len.is_finite() {
            return None;
        }

        Some(Self {
            cos: run / len,
            sin: rise / len,
        })
    }

    /// Direction with `run` and `rise` given as percentages of the P1 to P2
    /// distance.
    pub fn relative(run: f32, rise: f32, span: Point) -> Option<Self> {
        Self::new(run / 100.0 * span.x, rise / 100.0 * span.y)
    }

    #[inline]
    pub fn cos(&self) -> f32 {
        self.cos
    }

    #[inline]
    pub fn sin(&self) -> f32 {
        self.sin
    }

    /// Rotate `v` counter-clockwise by this direction.
    pub fn rotate(&self, v: Point) -> Point {
        Point::new(
            v.x * self.cos - v.y * self.sin,
            v.x * self.sin + v.y * self.cos,
        )
    }
}

/// A move of the label pen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub point: Point,
    pub pen: bool,
}

/// Strokes of a single character.
#[derive(Debug, Clone)]
pub struct Glyph {
    codes: &'static [u8],
    origin: Point,
    grid: Point,
    direction: Direction,
    advance: Option<Point>,
}

impl Glyph {
    fn blank(advance: Option<Point>) -> Self {
        Self {
            codes: &[],
            origin: Point::ORIGIN,
            grid: Point::ORIGIN,
            direction: Direction::HORIZONTAL,
            advance,
        }
    }
}

impl Iterator for Glyph {
    type Item = Stroke;

    fn next(&mut self) -> Option<Stroke> {
        let Some((code, rest)) = self.codes.split_first() else {
            return self.advance.take().map(|point| Stroke { point, pen: false });
        };
        self.codes = rest;

        let (x, y, pen) = font::decode(*code);
        let offset = Point::new(x * self.grid.x, (y - BASELINE) * self.grid.y);
        Some(Stroke {
            point: self.origin + self.direction.rotate(offset),
            pen,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Label {
    line_start: Point,
    cursor: Point,
    size: CharSize,
    direction: Direction,
}

impl Label {
    pub fn begin(origin: Point, size: CharSize, direction: Direction) -> Self {
        debug!("[text] label at {origin:?}, size {size:?}");
        Self {
            line_start: origin,
            cursor: origin,
            size,
            direction,
        }
    }

    /// Origin of the next character.
    #[inline]
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Where a carriage return goes back to.
    #[inline]
    pub fn line_start(&self) -> Point {
        self.line_start
    }

    #[inline]
    pub fn size(&self) -> CharSize {
        self.size
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The pen was moved by other means; keep the line start.
    pub fn set_cursor(&mut self, cursor: Point) {
        self.cursor = cursor;
    }

    pub fn set_size(&mut self, size: CharSize) {
        self.size = size;
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Lay out `byte` and move the cursor past it.
    pub fn glyph(&mut self, byte: u8) -> Glyph {
        match byte {
            b'\r' => {
                self.cursor = self.line_start;
                Glyph::blank(Some(self.cursor))
            },
            b'\n' => Glyph::blank(Some(self.new_line())),
            _ => match font::glyph_codes(byte) {
                Some(codes) => {
                    let origin = self.cursor;
                    self.cursor = origin + self.cell();
                    Glyph {
                        codes,
                        origin,
                        grid: self.size.grid(),
                        direction: self.direction,
                        advance: Some(self.cursor),
                    }
                },
                None => Glyph::blank(None),
            },
        }
    }

    /// Move by `spaces` cells and `lines` lines (up when positive). Returns
    /// the new cursor.
    pub fn plot(&mut self, spaces: f32, lines: f32) -> Point {
        let cell = self.cell();
        let line = self.line();
        let offset = cell * spaces - line * lines;

        self.cursor = self.cursor + offset;
        self.line_start = self.line_start - line * lines;
        self.cursor
    }

    /// Carriage return and line feed.
    pub fn new_line(&mut self) -> Point {
        self.line_start = self.line_start + self.line();
        self.cursor = self.line_start;
        self.cursor
    }

    fn cell(&self) -> Point {
        let grid = self.size.grid();
        self.direction.rotate(Point::new(CELL_ADVANCE * grid.x, 0.0))
    }

    /// One line down along the label axis.
    fn line(&self) -> Point {
        let height = LINE_SPACING * self.size.height;
        self.direction.rotate(Point::new(0.0, -height))
    }
}
