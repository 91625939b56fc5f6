//! Table of contents: outline recording, page reservation and backfill.
//!
//! The TOC is rendered in two steps. [`reserve_toc`] allocates the TOC pages
//! before any factor page exists, and [`backfill_toc`] draws the rows once the
//! real page numbers are known. Nothing else writes to the reserved pages.

use log::warn;

use crate::fonts::Face;
use crate::layout::LayoutContext;
use crate::primitives;
use crate::surface::{Point, Rect, Surface, TextStyle};
use crate::text::{line_height, truncate_to_width};

/// Heading drawn at the top of the first TOC page.
pub const TOC_TITLE: &str = "Sumário";

const FACTOR_SIZE: f64 = 12.0;
const FACTOR_GAP: f64 = 4.0;
const FACET_SIZE: f64 = 10.0;
const FACET_GAP: f64 = 2.0;
const FACET_INDENT: f64 = 16.0;
/// Width kept free for the page number column and the leader gap.
const NUMBER_COLUMN: f64 = 48.0;
const LEADER_GAP: f64 = 4.0;
const LEADER_DOT: &str = ".";
/// Leaders shorter than this are omitted altogether.
pub const MIN_LEADER_DOTS: usize = 3;

/// A facet row of the table of contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocFacet {
    /// Facet name.
    pub label: String,
    /// 1-based page number of the facet's card.
    pub page_index: usize,
}

/// A factor row of the table of contents, with its facet rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocEntry {
    /// Factor title.
    pub label: String,
    /// 1-based page number of the factor heading.
    pub page_index: usize,
    /// Facets in drawing order.
    pub facets: Vec<TocFacet>,
}

impl TocEntry {
    /// Creates an entry without facets.
    pub fn new(label: impl Into<String>, page_index: usize) -> Self {
        Self {
            label: label.into(),
            page_index,
            facets: Vec::new(),
        }
    }

    /// Appends a facet row.
    pub fn push_facet(&mut self, label: impl Into<String>, page_index: usize) {
        self.facets.push(TocFacet {
            label: label.into(),
            page_index,
        });
    }
}

/// Handle to the pages set aside for the table of contents.
#[derive(Clone, Debug, PartialEq)]
pub struct TocReservation {
    /// Reserved page indices, in order.
    pub pages: Vec<usize>,
    /// Cursor position right below the running header of a reserved page.
    pub start_y: f64,
}

struct Row {
    lines: Vec<String>,
    indent: f64,
    style: TextStyle,
    gap: f64,
    page_index: usize,
}

impl Row {
    fn height(&self) -> f64 {
        line_height(self.style.size) * self.lines.len() as f64 + self.gap
    }
}

fn rows<S: Surface>(ctx: &LayoutContext<S>, outline: &[TocEntry]) -> Vec<Row> {
    let theme = *ctx.theme();
    let factor_style = TextStyle::new(Face::Bold, FACTOR_SIZE, theme.primary);
    let facet_style = TextStyle::new(Face::Regular, FACET_SIZE, theme.text);
    let factor_width = ctx.content_width() - NUMBER_COLUMN;
    let facet_width = factor_width - FACET_INDENT;

    let mut rows = Vec::new();
    for entry in outline {
        let label = truncate_to_width(
            &entry.label,
            "…",
            ctx.metrics(),
            factor_style.face,
            factor_style.size,
            factor_width,
        );
        rows.push(Row {
            lines: vec![label],
            indent: 0.0,
            style: factor_style,
            gap: FACTOR_GAP,
            page_index: entry.page_index,
        });

        for facet in &entry.facets {
            let lines = ctx.wrap(&facet.label, facet_style.face, facet_style.size, facet_width);
            if lines.is_empty() {
                continue;
            }
            rows.push(Row {
                lines,
                indent: FACET_INDENT,
                style: facet_style,
                gap: FACET_GAP,
                page_index: facet.page_index,
            });
        }
    }
    rows
}

/// Allocates enough TOC pages for `planned` and returns their handle.
///
/// `planned` only needs labels; page numbers are ignored. Each reserved page
/// is opened through [`LayoutContext::new_page`], so it carries the running
/// header but no TOC content yet.
pub fn reserve_toc<S: Surface>(ctx: &mut LayoutContext<S>, planned: &[TocEntry]) -> TocReservation {
    let first = ctx.new_page();
    let start_y = ctx.cursor_y();
    let capacity = start_y - ctx.safe_bottom();

    let mut pages = vec![first];
    let mut used = primitives::heading_height();
    for row in rows(ctx, planned) {
        let height = row.height();
        if used + height > capacity {
            pages.push(ctx.new_page());
            used = 0.0;
        }
        used += height;
    }

    TocReservation { pages, start_y }
}

/// Draws the table of contents into the reserved pages.
///
/// Every row gets its label, a right-aligned page number, a leader of dots
/// between them and a full-width jump target to the recorded page. Facet
/// labels may wrap; only their first line carries the leader, number and
/// jump target. Rows that do not fit the reserved pages are dropped.
pub fn backfill_toc<S: Surface>(
    ctx: &mut LayoutContext<S>,
    reservation: &TocReservation,
    outline: &[TocEntry],
) {
    let Some((&first, rest)) = reservation.pages.split_first() else {
        return;
    };
    let mut remaining_pages = rest.iter();

    let resume_page = ctx.page();
    ctx.select_page(first);
    ctx.set_cursor_y(reservation.start_y);
    primitives::heading(ctx, TOC_TITLE);

    let rows = rows(ctx, outline);
    let total = rows.len();
    for (index, row) in rows.iter().enumerate() {
        if !ctx.fits(row.height()) {
            let Some(&next) = remaining_pages.next() else {
                warn!(
                    "Table of contents overflowed its {} reserved page(s); {} row(s) dropped",
                    reservation.pages.len(),
                    total - index
                );
                break;
            };
            ctx.select_page(next);
            ctx.set_cursor_y(reservation.start_y);
        }
        draw_row(ctx, row);
    }

    ctx.select_page(resume_page);
}

fn draw_row<S: Surface>(ctx: &mut LayoutContext<S>, row: &Row) {
    let theme = *ctx.theme();
    let size = row.style.size;
    let line_h = line_height(size);
    let top = ctx.cursor_y();
    let x = ctx.left() + row.indent;

    for (index, line) in row.lines.iter().enumerate() {
        let baseline = top - size - line_h * index as f64;
        ctx.draw_text(Point::new(x, baseline), line, row.style);
    }

    let baseline = top - size;
    let number = row.page_index.to_string();
    let number_x = ctx.right() - ctx.measure(row.style.face, &number, size);
    ctx.draw_text(Point::new(number_x, baseline), &number, row.style);

    let label_end = x + ctx.measure(row.style.face, &row.lines[0], size) + LEADER_GAP;
    let leader = leader_dots(
        number_x - LEADER_GAP - label_end,
        ctx.measure(Face::Regular, LEADER_DOT, size),
    );
    if let Some(dots) = leader {
        let dots_x = number_x - LEADER_GAP - ctx.measure(Face::Regular, &dots, size);
        ctx.draw_text(
            Point::new(dots_x, baseline),
            &dots,
            TextStyle::new(Face::Regular, size, theme.muted),
        );
    }

    ctx.link(
        Rect::new(ctx.left(), top - line_h, ctx.content_width(), line_h),
        row.page_index.saturating_sub(1),
    );
    ctx.advance(row.height());
}

/// Builds the leader filling `available` points with dots of `dot_width`.
///
/// Returns `None` when fewer than [`MIN_LEADER_DOTS`] dots would fit.
pub fn leader_dots(available: f64, dot_width: f64) -> Option<String> {
    if dot_width <= 0.0 || available <= 0.0 {
        return None;
    }
    let count = (available / dot_width).floor() as usize;
    (count >= MIN_LEADER_DOTS).then(|| LEADER_DOT.repeat(count))
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

    fn outline(factors: usize, facets: usize) -> Vec<TocEntry> {
        (0..factors)
            .map(|factor| {
                let mut entry = TocEntry::new(format!("Fator {factor}"), 3 + factor);
                for facet in 0..facets {
                    entry.push_facet(format!("Faceta {factor}.{facet}"), 3 + factor);
                }
                entry
            })
            .collect()
    }

    #[test]
    fn leader_is_omitted_when_too_short() {
        assert_eq!(leader_dots(10.0, 4.0), None);
        assert_eq!(leader_dots(12.0, 4.0).as_deref(), Some("..."));
        assert_eq!(leader_dots(50.0, 0.0), None);
        assert_eq!(leader_dots(-3.0, 4.0), None);
    }

    #[test]
    fn small_outline_reserves_a_single_page() {
        let mut ctx = context();
        let reservation = reserve_toc(&mut ctx, &outline(5, 4));
        assert_eq!(reservation.pages, vec![1]);
        assert_eq!(ctx.page_count(), 2);
    }

    #[test]
    fn large_outline_reserves_extra_pages() {
        let mut ctx = context();
        let reservation = reserve_toc(&mut ctx, &outline(10, 10));
        assert!(reservation.pages.len() > 1);
        assert_eq!(reservation.pages, (1..=reservation.pages.len()).collect::<Vec<_>>());
    }

    #[test]
    fn backfill_draws_rows_and_links_on_reserved_pages() {
        let mut ctx = context();
        let planned = outline(10, 10);
        let reservation = reserve_toc(&mut ctx, &planned);
        ctx.new_page();
        let content_page = ctx.page();

        backfill_toc(&mut ctx, &reservation, &planned);

        assert_eq!(ctx.page(), content_page);
        let links: Vec<_> = ctx.surface().links().collect();
        assert_eq!(links.len(), 10 + 100);
        assert!(links
            .iter()
            .all(|(page, _, _)| reservation.pages.contains(page)));
        assert!(ctx.surface().find_text("Faceta 9.9").is_some());
        assert_eq!(ctx.surface().find_text(TOC_TITLE).map(|(page, _)| page), Some(1));
    }

    #[test]
    fn wrapped_facets_link_only_their_first_line() {
        let mut ctx = context();
        let mut entry = TocEntry::new("Abertura", 3);
        entry.push_facet("Faceta com um nome longo o bastante para ocupar duas linhas inteiras do sumário sem dúvida", 4);
        let planned = vec![entry];
        let reservation = reserve_toc(&mut ctx, &planned);
        backfill_toc(&mut ctx, &reservation, &planned);

        let facet_links: Vec<_> = ctx
            .surface()
            .links()
            .filter(|(_, _, target)| *target == 3)
            .collect();
        assert_eq!(facet_links.len(), 1);
        let numbers = ctx.surface().texts().filter(|(_, _, text)| *text == "4").count();
        assert_eq!(numbers, 1);
    }

    #[test]
    fn overflowing_rows_are_dropped_without_new_pages() {
        let mut ctx = context();
        let reservation = reserve_toc(&mut ctx, &outline(1, 1));
        let pages = ctx.page_count();
        backfill_toc(&mut ctx, &reservation, &outline(10, 20));
        assert_eq!(ctx.page_count(), pages);
        assert!(ctx
            .surface()
            .ops()
            .iter()
            .all(|op| op.page() == reservation.pages[0]));
    }
}
