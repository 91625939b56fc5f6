//! Closing credits band.

use crate::fonts::Face;
use crate::layout::LayoutContext;
use crate::surface::{Point, Rect, Surface, TextStyle};
use crate::text::line_height;

const CREDITS_SIZE: f64 = 9.0;
const CREDITS_PADDING: f64 = 14.0;
const CREDITS_GAP: f64 = 16.0;

/// Draws the closing credits band with one centred row per line.
///
/// Returns the page the band landed on, or `None` when there is nothing to
/// draw.
pub fn render_credits<S: Surface>(ctx: &mut LayoutContext<S>, lines: &[String]) -> Option<usize> {
    let lines: Vec<&str> = lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();
    if lines.is_empty() {
        return None;
    }

    let theme = *ctx.theme();
    let style = TextStyle::new(Face::Regular, CREDITS_SIZE, theme.muted);
    let height = 2.0 * CREDITS_PADDING + line_height(CREDITS_SIZE) * lines.len() as f64;
    ctx.ensure(CREDITS_GAP + height);
    ctx.advance(CREDITS_GAP);

    let top = ctx.cursor_y();
    ctx.fill_rect(
        Rect::new(ctx.left(), top - height, ctx.content_width(), height),
        theme.background,
    );

    let mut y = top - CREDITS_PADDING;
    for line in lines {
        let width = ctx.measure(style.face, line, CREDITS_SIZE);
        let x = ctx.left() + ((ctx.content_width() - width) / 2.0).max(0.0);
        ctx.draw_text(Point::new(x, y - CREDITS_SIZE), line, style);
        y -= line_height(CREDITS_SIZE);
    }

    ctx.advance(height);
    Some(ctx.page())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PageGeometry;
    use crate::surface::RecordingSurface;
    use crate::theme::Theme;

    fn context() -> LayoutContext<RecordingSurface> {
        LayoutContext::new(
            RecordingSurface::new(),
            PageGeometry::default(),
            Theme::default(),
        )
    }

    #[test]
    fn blank_credits_draw_nothing() {
        let mut ctx = context();
        assert_eq!(render_credits(&mut ctx, &["  ".to_owned()]), None);
        assert!(ctx.surface().ops().is_empty());
    }

    #[test]
    fn credits_move_to_a_new_page_when_needed() {
        let mut ctx = context();
        let bottom = ctx.safe_bottom();
        ctx.set_cursor_y(bottom + 20.0);
        let page = render_credits(&mut ctx, &["Equipe de Psicologia".to_owned()]);
        assert_eq!(page, Some(1));
        assert_eq!(
            ctx.surface().find_text("Equipe de Psicologia").map(|(page, _)| page),
            Some(1)
        );
    }
}
