//! Drawing backends.
//!
//! The layout engine draws through the [`Surface`] trait, in PDF points with
//! the origin at the bottom-left corner of each page. Pages are addressed by
//! their 0-based index and are only ever appended.

use genpdf::style::Color;

use crate::fonts::{Face, TextMeasure};

mod pdf;
mod recording;

pub use pdf::PdfSurface;
pub use recording::{DrawOp, RecordingSurface};

/// A position on a page, in points.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    /// Distance from the left page edge.
    pub x: f64,
    /// Distance from the bottom page edge.
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle anchored at its bottom-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Bottom edge.
    pub y: f64,
    /// Width in points.
    pub width: f64,
    /// Height in points.
    pub height: f64,
}

impl Rect {
    /// Creates a rectangle from its bottom-left corner and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top edge.
    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Whether `point` lies inside the rectangle (edges included).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.top()
    }
}

/// Font selection for a text run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Face to set the text in.
    pub face: Face,
    /// Size in points.
    pub size: f64,
    /// Fill colour of the glyphs.
    pub color: Color,
}

impl TextStyle {
    /// Creates a text style.
    pub fn new(face: Face, size: f64, color: Color) -> Self {
        Self { face, size, color }
    }
}

/// A paged drawing target.
///
/// A freshly created surface holds exactly one blank page.
pub trait Surface: TextMeasure {
    /// Number of pages created so far.
    fn page_count(&self) -> usize;

    /// Appends a blank page and returns its index.
    fn add_page(&mut self) -> usize;

    /// Draws a single line of text with its baseline starting at `origin`.
    fn draw_text(&mut self, page: usize, origin: Point, text: &str, style: TextStyle);

    /// Fills a rectangle.
    fn fill_rect(&mut self, page: usize, rect: Rect, color: Color);

    /// Strokes a straight line.
    fn stroke_line(&mut self, page: usize, from: Point, to: Point, thickness: f64, color: Color);

    /// Registers a clickable area on `page` that jumps to `target_page`.
    fn link(&mut self, page: usize, area: Rect, target_page: usize);
}
