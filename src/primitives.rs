//! Drawing primitives.
//!
//! Every primitive measures its full height first, calls
//! [`LayoutContext::ensure`] with it, then draws and advances the cursor, so a
//! primitive is never split across two pages. Text taller than a whole page is
//! the exception: paragraphs then flow line by line, and boxes keep what fits
//! and continue the rest as a paragraph underneath. Each returns the index of
//! the page it was drawn on.

use genpdf::style::Color;

use crate::fonts::Face;
use crate::layout::LayoutContext;
use crate::surface::{Point, Rect, Surface, TextStyle};
use crate::text::{justify_text, line_height, truncate_to_width};

/// Heading font size.
pub const HEADING_SIZE: f64 = 18.0;
const HEADING_PADDING: f64 = 8.0;
/// Subheading font size.
pub const SUBHEADING_SIZE: f64 = 13.0;
const SUBHEADING_PADDING: f64 = 6.0;
/// Section label font size.
pub const LABEL_SIZE: f64 = 11.0;
const LABEL_PADDING: f64 = 3.0;
/// Body text font size.
pub const BODY_SIZE: f64 = 10.5;
const PARAGRAPH_GAP: f64 = 6.0;

const BULLET_MARKER: &str = "•";
const BULLET_INDENT: f64 = 14.0;
const BULLET_ITEM_GAP: f64 = 3.0;

const DIVIDER_HEIGHT: f64 = 12.0;
const DIVIDER_THICKNESS: f64 = 0.75;

const CALLOUT_PADDING: f64 = 10.0;
const CALLOUT_BAR: f64 = 4.0;
const CALLOUT_TITLE_SIZE: f64 = 11.0;
const CALLOUT_BODY_SIZE: f64 = 10.0;
const CALLOUT_TITLE_GAP: f64 = 4.0;
const BLOCK_GAP: f64 = 10.0;

/// Cards are never shorter than this, whatever their content.
pub const CARD_MIN_HEIGHT: f64 = 72.0;
const CARD_PADDING: f64 = 12.0;
const CARD_BAR: f64 = 5.0;
const CARD_TITLE_SIZE: f64 = 13.0;
const CARD_BODY_SIZE: f64 = 10.0;
const CARD_INNER_GAP: f64 = 6.0;
const CARD_GAP: f64 = 12.0;
const BADGE_SIZE: f64 = 9.0;
const BADGE_HEIGHT: f64 = 16.0;
const BADGE_PADDING_X: f64 = 8.0;

const MAX_BOX_TITLE_LINES: usize = 3;

const ELLIPSIS: &str = "…";

/// Draws `lines` top-down starting at `top`; returns the y below the last line.
fn draw_lines<S: Surface>(
    ctx: &mut LayoutContext<S>,
    x: f64,
    mut top: f64,
    lines: &[String],
    style: TextStyle,
) -> f64 {
    for line in lines {
        ctx.draw_text(Point::new(x, top - style.size), line, style);
        top -= line_height(style.size);
    }
    top
}

/// Splits `lines` after as many as fit in `available` points of height.
fn split_to_fit(
    mut lines: Vec<String>,
    line_h: f64,
    available: f64,
) -> (Vec<String>, Vec<String>) {
    let fitting = (available / line_h).floor().max(0.0) as usize;
    if lines.len() <= fitting {
        return (lines, Vec::new());
    }
    let rest = lines.split_off(fitting);
    (lines, rest)
}

/// Keeps at most [`MAX_BOX_TITLE_LINES`] lines, ending the last kept one with
/// an ellipsis when text was cut.
fn clamp_title<S: Surface>(
    ctx: &LayoutContext<S>,
    mut lines: Vec<String>,
    style: TextStyle,
    width: f64,
) -> Vec<String> {
    if lines.len() <= MAX_BOX_TITLE_LINES {
        return lines;
    }
    let cut = lines.split_off(MAX_BOX_TITLE_LINES - 1).join(" ");
    lines.push(truncate_to_width(
        &cut,
        ELLIPSIS,
        ctx.metrics(),
        style.face,
        style.size,
        width,
    ));
    lines
}

fn single_line<S: Surface>(
    ctx: &mut LayoutContext<S>,
    text: &str,
    style: TextStyle,
    padding: f64,
) -> usize {
    let height = line_height(style.size) + padding;
    ctx.ensure(height);

    let text = truncate_to_width(
        text,
        ELLIPSIS,
        ctx.metrics(),
        style.face,
        style.size,
        ctx.content_width(),
    );
    let top = ctx.cursor_y();
    ctx.draw_text(Point::new(ctx.left(), top - style.size), &text, style);
    ctx.advance(height);
    ctx.page()
}

/// Vertical space taken by [`heading`].
pub fn heading_height() -> f64 {
    line_height(HEADING_SIZE) + HEADING_PADDING
}

/// Draws a single-line heading in the primary colour.
pub fn heading<S: Surface>(ctx: &mut LayoutContext<S>, text: &str) -> usize {
    let style = TextStyle::new(Face::Bold, HEADING_SIZE, ctx.theme().primary);
    single_line(ctx, text, style, HEADING_PADDING)
}

/// Draws a single-line subheading.
pub fn subheading<S: Surface>(ctx: &mut LayoutContext<S>, text: &str) -> usize {
    let style = TextStyle::new(Face::Bold, SUBHEADING_SIZE, ctx.theme().text);
    single_line(ctx, text, style, SUBHEADING_PADDING)
}

/// Vertical space taken by [`section_label`].
pub fn section_label_height() -> f64 {
    line_height(LABEL_SIZE) + LABEL_PADDING
}

/// Draws a small accent-coloured label introducing a subsection.
pub fn section_label<S: Surface>(ctx: &mut LayoutContext<S>, text: &str) -> usize {
    let style = TextStyle::new(Face::Bold, LABEL_SIZE, ctx.theme().accent);
    single_line(ctx, text, style, LABEL_PADDING)
}

/// Height a wrapped paragraph of `lines` lines occupies.
pub fn paragraph_height(lines: usize, size: f64) -> f64 {
    line_height(size) * lines as f64 + PARAGRAPH_GAP
}

/// Draws a left-aligned wrapped paragraph of body text.
pub fn paragraph<S: Surface>(ctx: &mut LayoutContext<S>, text: &str) -> usize {
    let style = TextStyle::new(Face::Regular, BODY_SIZE, ctx.theme().text);
    styled_paragraph(ctx, text, style)
}

/// Draws a left-aligned wrapped paragraph in an explicit style.
///
/// Paragraphs taller than a whole page are laid out line by line instead.
pub fn styled_paragraph<S: Surface>(
    ctx: &mut LayoutContext<S>,
    text: &str,
    style: TextStyle,
) -> usize {
    let lines = ctx.wrap(text, style.face, style.size, ctx.content_width());
    if lines.is_empty() {
        return ctx.page();
    }

    let height = paragraph_height(lines.len(), style.size);
    if height > ctx.geometry().content_height() {
        for line in &lines {
            let line_h = line_height(style.size);
            ctx.ensure(line_h);
            let top = ctx.cursor_y();
            let left = ctx.left();
            draw_lines(ctx, left, top, std::slice::from_ref(line), style);
            ctx.advance(line_h);
        }
        ctx.advance(PARAGRAPH_GAP);
        return ctx.page();
    }

    ctx.ensure(height);
    let (left, top) = (ctx.left(), ctx.cursor_y());
    draw_lines(ctx, left, top, &lines, style);
    ctx.advance(height);
    ctx.page()
}

/// Draws a bullet list; each item wraps independently under its marker.
///
/// The whole list is kept together when it fits on one page; otherwise each
/// item is ensured on its own.
pub fn bullet_list<S: Surface>(ctx: &mut LayoutContext<S>, items: &[String]) -> usize {
    let style = TextStyle::new(Face::Regular, BODY_SIZE, ctx.theme().text);
    let marker_style = TextStyle::new(Face::Bold, BODY_SIZE, ctx.theme().accent);
    let text_width = ctx.content_width() - BULLET_INDENT;

    let wrapped: Vec<Vec<String>> = items
        .iter()
        .map(|item| ctx.wrap(item, style.face, style.size, text_width))
        .filter(|lines| !lines.is_empty())
        .collect();
    if wrapped.is_empty() {
        return ctx.page();
    }

    let item_height =
        |lines: &[String]| line_height(style.size) * lines.len() as f64 + BULLET_ITEM_GAP;
    let total: f64 = wrapped.iter().map(|lines| item_height(lines)).sum();
    let trailing_gap = PARAGRAPH_GAP - BULLET_ITEM_GAP;
    let keep_together = total + trailing_gap <= ctx.geometry().content_height();
    if keep_together {
        ctx.ensure(total + trailing_gap);
    }

    let left = ctx.left();
    for lines in &wrapped {
        let height = item_height(lines);
        if height > ctx.geometry().content_height() {
            let line_h = line_height(style.size);
            for (index, line) in lines.iter().enumerate() {
                ctx.ensure(line_h);
                let top = ctx.cursor_y();
                if index == 0 {
                    ctx.draw_text(Point::new(left, top - style.size), BULLET_MARKER, marker_style);
                }
                draw_lines(ctx, left + BULLET_INDENT, top, std::slice::from_ref(line), style);
                ctx.advance(line_h);
            }
            ctx.advance(BULLET_ITEM_GAP);
            continue;
        }

        if !keep_together {
            ctx.ensure(height);
        }
        let top = ctx.cursor_y();
        ctx.draw_text(Point::new(left, top - style.size), BULLET_MARKER, marker_style);
        draw_lines(ctx, left + BULLET_INDENT, top, lines, style);
        ctx.advance(height);
    }
    ctx.advance(trailing_gap);
    ctx.page()
}

/// Draws a thin horizontal rule across the content column.
pub fn divider<S: Surface>(ctx: &mut LayoutContext<S>) -> usize {
    ctx.ensure(DIVIDER_HEIGHT);
    let y = ctx.cursor_y() - DIVIDER_HEIGHT / 2.0;
    let color = ctx.theme().divider;
    ctx.stroke_line(
        Point::new(ctx.left(), y),
        Point::new(ctx.right(), y),
        DIVIDER_THICKNESS,
        color,
    );
    ctx.advance(DIVIDER_HEIGHT);
    ctx.page()
}

/// Visual flavour of a callout box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalloutVariant {
    /// Neutral background, accent bar.
    Info,
    /// Tinted background, danger bar.
    Warning,
}

/// Draws a boxed title + body with a coloured accent bar.
pub fn callout<S: Surface>(
    ctx: &mut LayoutContext<S>,
    title: &str,
    body: &str,
    variant: CalloutVariant,
) -> usize {
    let theme = *ctx.theme();
    let (fill, bar) = match variant {
        CalloutVariant::Info => (theme.background, theme.accent),
        CalloutVariant::Warning => (theme.danger_background, theme.danger),
    };
    let title_style = TextStyle::new(Face::Bold, CALLOUT_TITLE_SIZE, bar);
    let body_style = TextStyle::new(Face::Regular, CALLOUT_BODY_SIZE, theme.text);

    let inner_width = ctx.content_width() - CALLOUT_BAR - 2.0 * CALLOUT_PADDING;
    let title_lines = ctx.wrap(title, title_style.face, title_style.size, inner_width);
    let title_lines = clamp_title(ctx, title_lines, title_style, inner_width);
    let body_lines = ctx.wrap(body, body_style.face, body_style.size, inner_width);

    let frame = 2.0 * CALLOUT_PADDING
        + line_height(title_style.size) * title_lines.len() as f64
        + CALLOUT_TITLE_GAP;
    let (body_lines, overflow) = split_to_fit(
        body_lines,
        line_height(body_style.size),
        ctx.geometry().content_height() - BLOCK_GAP - frame,
    );
    let height = frame + line_height(body_style.size) * body_lines.len() as f64;
    ctx.ensure(height + BLOCK_GAP);

    let top = ctx.cursor_y();
    let left = ctx.left();
    ctx.fill_rect(Rect::new(left, top - height, ctx.content_width(), height), fill);
    ctx.fill_rect(Rect::new(left, top - height, CALLOUT_BAR, height), bar);

    let text_x = left + CALLOUT_BAR + CALLOUT_PADDING;
    let y = draw_lines(ctx, text_x, top - CALLOUT_PADDING, &title_lines, title_style);
    draw_lines(ctx, text_x, y - CALLOUT_TITLE_GAP, &body_lines, body_style);

    let page = ctx.page();
    ctx.advance(height + BLOCK_GAP);
    if !overflow.is_empty() {
        styled_paragraph(ctx, &overflow.join(" "), body_style);
    }
    page
}

/// Content of a scored card.
#[derive(Clone, Debug, PartialEq)]
pub struct Card<'a> {
    /// Card title (wrapped, bold).
    pub title: &'a str,
    /// Optional body text under the badge.
    pub description: &'a str,
    /// Text inside the badge pill.
    pub badge: &'a str,
    /// Badge and accent-bar colour.
    pub badge_color: Color,
}

/// Width of a badge pill holding `label`.
pub fn badge_width<S: Surface>(ctx: &LayoutContext<S>, label: &str) -> f64 {
    ctx.measure(Face::Bold, label, BADGE_SIZE) + 2.0 * BADGE_PADDING_X
}

/// Draws a card with a title, a badge pill and a description.
pub fn card<S: Surface>(ctx: &mut LayoutContext<S>, card: &Card<'_>) -> usize {
    let theme = *ctx.theme();
    let title_style = TextStyle::new(Face::Bold, CARD_TITLE_SIZE, theme.text);
    let body_style = TextStyle::new(Face::Regular, CARD_BODY_SIZE, theme.muted);
    let badge_style = TextStyle::new(Face::Bold, BADGE_SIZE, theme.on_primary);

    let inner_width = ctx.content_width() - CARD_BAR - 2.0 * CARD_PADDING;
    let title_lines = ctx.wrap(card.title, title_style.face, title_style.size, inner_width);
    let title_lines = clamp_title(ctx, title_lines, title_style, inner_width);
    let body_lines = ctx.wrap(card.description, body_style.face, body_style.size, inner_width);

    let mut content_height = 2.0 * CARD_PADDING
        + line_height(title_style.size) * title_lines.len() as f64
        + CARD_INNER_GAP
        + BADGE_HEIGHT;
    let (body_lines, overflow) = split_to_fit(
        body_lines,
        line_height(body_style.size),
        ctx.geometry().content_height() - CARD_GAP - content_height - CARD_INNER_GAP,
    );
    if !body_lines.is_empty() {
        content_height +=
            CARD_INNER_GAP + line_height(body_style.size) * body_lines.len() as f64;
    }
    let height = content_height.max(CARD_MIN_HEIGHT);
    ctx.ensure(height + CARD_GAP);

    let top = ctx.cursor_y();
    let left = ctx.left();
    ctx.fill_rect(
        Rect::new(left, top - height, ctx.content_width(), height),
        theme.card,
    );
    ctx.fill_rect(Rect::new(left, top - height, CARD_BAR, height), card.badge_color);

    let inner_x = left + CARD_BAR + CARD_PADDING;
    let mut y = draw_lines(ctx, inner_x, top - CARD_PADDING, &title_lines, title_style);

    y -= CARD_INNER_GAP;
    let pill = Rect::new(
        inner_x,
        y - BADGE_HEIGHT,
        badge_width(ctx, card.badge),
        BADGE_HEIGHT,
    );
    ctx.fill_rect(pill, card.badge_color);
    let baseline = pill.y + (BADGE_HEIGHT - BADGE_SIZE * 0.7) / 2.0;
    ctx.draw_text(
        Point::new(pill.x + BADGE_PADDING_X, baseline),
        card.badge,
        badge_style,
    );
    y -= BADGE_HEIGHT;

    if !body_lines.is_empty() {
        draw_lines(ctx, inner_x, y - CARD_INNER_GAP, &body_lines, body_style);
    }

    let page = ctx.page();
    ctx.advance(height + CARD_GAP);
    if !overflow.is_empty() {
        styled_paragraph(ctx, &overflow.join(" "), body_style);
    }
    page
}

/// Draws a fully justified paragraph.
///
/// All lines but the last are stretched to the right margin; the last line
/// and single-word lines stay left-aligned.
pub fn justified_paragraph<S: Surface>(ctx: &mut LayoutContext<S>, text: &str, size: f64) -> usize {
    let style = TextStyle::new(Face::Regular, size, ctx.theme().text);
    let lines = justify_text(text, ctx.metrics(), style.face, size, ctx.content_width());
    if lines.is_empty() {
        return ctx.page();
    }

    let line_h = line_height(size);
    let height = paragraph_height(lines.len(), size);
    let flowing = height > ctx.geometry().content_height();
    if !flowing {
        ctx.ensure(height);
    }

    let left = ctx.left();
    for line in &lines {
        if flowing {
            ctx.ensure(line_h);
        }
        let baseline = ctx.cursor_y() - size;
        for (word, offset) in line.words.iter().zip(&line.offsets) {
            ctx.draw_text(Point::new(left + offset, baseline), word, style);
        }
        ctx.advance(line_h);
    }
    ctx.advance(PARAGRAPH_GAP);
    ctx.page()
}
