//! Final footer pass.

use crate::fonts::Face;
use crate::layout::LayoutContext;
use crate::surface::{Point, Surface, TextStyle};

const FOOTER_SIZE: f64 = 9.0;
const RULE_THICKNESS: f64 = 0.5;
/// Gap between the footer rule and the top of the footer band.
const RULE_INSET: f64 = 2.0;

/// Footer text of page `number` out of `total`.
pub fn page_label(number: usize, total: usize) -> String {
    format!("{number} / {total}")
}

/// Stamps `"N / TOTAL"` and a rule on every page except the cover.
///
/// Must run after every page has been created. Returns the number of pages
/// that received a footer.
pub fn stamp_footers<S: Surface>(ctx: &mut LayoutContext<S>) -> usize {
    let total = ctx.page_count();
    let cover = ctx.cover_page();
    let resume_page = ctx.page();
    let geometry = *ctx.geometry();
    let theme = *ctx.theme();

    let style = TextStyle::new(Face::Regular, FOOTER_SIZE, theme.muted);
    let rule_y = geometry.safe_bottom() - RULE_INSET;
    let baseline = geometry.margin + (geometry.footer_height - FOOTER_SIZE) / 2.0;

    let mut stamped = 0;
    for page in (0..total).filter(|page| Some(*page) != cover) {
        ctx.select_page(page);
        ctx.stroke_line(
            Point::new(ctx.left(), rule_y),
            Point::new(ctx.right(), rule_y),
            RULE_THICKNESS,
            theme.divider,
        );

        let label = page_label(page + 1, total);
        let x = ctx.right() - ctx.measure(style.face, &label, FOOTER_SIZE);
        ctx.draw_text(Point::new(x, baseline), &label, style);
        stamped += 1;
    }

    ctx.select_page(resume_page);
    stamped
}
