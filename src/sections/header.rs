//! Running header drawn on every page after the cover.

use crate::fonts::Face;
use crate::layout::{LayoutContext, PageDecorator};
use crate::surface::{Point, Surface, TextStyle};
use crate::text::truncate_to_width;

const HEADER_SIZE: f64 = 9.0;
const RULE_THICKNESS: f64 = 0.5;
/// Distance between the header rule and the top of the content area.
const RULE_OFFSET: f64 = 6.0;

/// Page decorator drawing the report title and a rule in the header band.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunningHeader {
    title: String,
}

impl RunningHeader {
    /// Creates a header repeating `title` on every decorated page.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl<S: Surface> PageDecorator<S> for RunningHeader {
    fn decorate(&mut self, context: &mut LayoutContext<S>) {
        let geometry = *context.geometry();
        let theme = *context.theme();
        let band_top = geometry.height - geometry.margin;
        let rule_y = geometry.content_top() + RULE_OFFSET;

        let title = truncate_to_width(
            &self.title,
            "…",
            context.metrics(),
            Face::Regular,
            HEADER_SIZE,
            context.content_width(),
        );
        context.draw_text(
            Point::new(context.left(), band_top - HEADER_SIZE),
            &title,
            TextStyle::new(Face::Regular, HEADER_SIZE, theme.muted),
        );
        context.stroke_line(
            Point::new(context.left(), rule_y),
            Point::new(context.right(), rule_y),
            RULE_THICKNESS,
            theme.divider,
        );
    }
}
