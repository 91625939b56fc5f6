//! In-memory surface that records drawing operations.

use genpdf::style::Color;

use super::{Point, Rect, Surface, TextStyle};
use crate::fonts::{Face, FixedMetrics, TextMeasure};

/// A drawing operation captured by [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// A text run.
    Text {
        /// Page the text was drawn on.
        page: usize,
        /// Baseline origin.
        origin: Point,
        /// The text itself.
        text: String,
        /// Face, size and colour.
        style: TextStyle,
    },
    /// A filled rectangle.
    Fill {
        /// Page the rectangle was drawn on.
        page: usize,
        /// The filled area.
        rect: Rect,
        /// Fill colour.
        color: Color,
    },
    /// A stroked line.
    Line {
        /// Page the line was drawn on.
        page: usize,
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
    },
    /// A clickable jump target.
    Link {
        /// Page holding the clickable area.
        page: usize,
        /// The clickable area.
        area: Rect,
        /// Destination page index.
        target_page: usize,
    },
}

impl DrawOp {
    /// Page the operation was drawn on.
    pub fn page(&self) -> usize {
        match self {
            Self::Text { page, .. }
            | Self::Fill { page, .. }
            | Self::Line { page, .. }
            | Self::Link { page, .. } => *page,
        }
    }
}

/// In-memory surface that records drawing operations.
///
/// Text is measured with [`FixedMetrics`], so layouts are reproducible without
/// any font files.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    metrics: FixedMetrics,
    pages: usize,
    ops: Vec<DrawOp>,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    /// Creates a surface holding one blank page.
    pub fn new() -> Self {
        Self::with_metrics(FixedMetrics::default())
    }

    /// Creates a surface measuring text with the given metrics.
    pub fn with_metrics(metrics: FixedMetrics) -> Self {
        Self {
            metrics,
            pages: 1,
            ops: Vec::new(),
        }
    }

    /// All recorded operations in drawing order.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Iterates over recorded text runs as `(page, origin, text)`.
    pub fn texts(&self) -> impl Iterator<Item = (usize, Point, &str)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text {
                page, origin, text, ..
            } => Some((*page, *origin, text.as_str())),
            _ => None,
        })
    }

    /// Returns the first text run equal to `needle`.
    pub fn find_text(&self, needle: &str) -> Option<(usize, Point)> {
        self.texts()
            .find(|(_, _, text)| *text == needle)
            .map(|(page, origin, _)| (page, origin))
    }

    /// Iterates over recorded links as `(page, area, target_page)`.
    pub fn links(&self) -> impl Iterator<Item = (usize, Rect, usize)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Link {
                page,
                area,
                target_page,
            } => Some((*page, *area, *target_page)),
            _ => None,
        })
    }
}

impl TextMeasure for RecordingSurface {
    fn text_width(&self, face: Face, text: &str, size: f64) -> f64 {
        self.metrics.text_width(face, text, size)
    }
}

impl Surface for RecordingSurface {
    fn page_count(&self) -> usize {
        self.pages
    }

    fn add_page(&mut self) -> usize {
        self.pages += 1;
        self.pages - 1
    }

    fn draw_text(&mut self, page: usize, origin: Point, text: &str, style: TextStyle) {
        self.ops.push(DrawOp::Text {
            page,
            origin,
            text: text.to_owned(),
            style,
        });
    }

    fn fill_rect(&mut self, page: usize, rect: Rect, color: Color) {
        self.ops.push(DrawOp::Fill { page, rect, color });
    }

    fn stroke_line(&mut self, page: usize, from: Point, to: Point, _thickness: f64, _color: Color) {
        self.ops.push(DrawOp::Line { page, from, to });
    }

    fn link(&mut self, page: usize, area: Rect, target_page: usize) {
        self.ops.push(DrawOp::Link {
            page,
            area,
            target_page,
        });
    }
}
