//! Page cursor and pagination primitive.

use genpdf::style::Color;
use log::debug;

use crate::fonts::{Face, TextMeasure};
use crate::surface::{Point, Rect, Surface, TextStyle};
use crate::text::wrap_text;
use crate::theme::Theme;

/// Page size and the fixed bands reserved on every page, in points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    /// Page width.
    pub width: f64,
    /// Page height.
    pub height: f64,
    /// Margin applied on all four sides.
    pub margin: f64,
    /// Height of the running-header band below the top margin.
    pub header_height: f64,
    /// Height of the footer band above the bottom margin.
    pub footer_height: f64,
}

impl PageGeometry {
    /// A4 portrait with the default margins and bands.
    pub const A4: PageGeometry = PageGeometry {
        width: 595.28,
        height: 841.89,
        margin: 48.0,
        header_height: 28.0,
        footer_height: 24.0,
    };

    /// Lowest y a primitive may draw down to.
    pub fn safe_bottom(&self) -> f64 {
        self.margin + self.footer_height
    }

    /// y at which content starts on a fresh page.
    pub fn content_top(&self) -> f64 {
        self.height - self.margin - self.header_height
    }

    /// Vertical space available for content on one page.
    pub fn content_height(&self) -> f64 {
        self.content_top() - self.safe_bottom()
    }

    /// Horizontal space between the side margins.
    pub fn content_width(&self) -> f64 {
        self.width - 2.0 * self.margin
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::A4
    }
}

/// Hook invoked every time [`LayoutContext`] opens a new page.
///
/// The cursor has already been reset to the content top when the hook runs.
pub trait PageDecorator<S: Surface> {
    /// Draws page furniture (such as a running header) on the current page.
    fn decorate(&mut self, context: &mut LayoutContext<S>);
}

/// Mutable layout state for a single document build.
pub struct LayoutContext<S: Surface> {
    surface: S,
    geometry: PageGeometry,
    theme: Theme,
    page: usize,
    cursor_x: f64,
    cursor_y: f64,
    cover_page: Option<usize>,
    decorator: Option<Box<dyn PageDecorator<S>>>,
}

impl<S: Surface> LayoutContext<S> {
    /// Creates a context drawing into the first page of `surface`.
    pub fn new(surface: S, geometry: PageGeometry, theme: Theme) -> Self {
        let page = surface.page_count().saturating_sub(1);
        Self {
            surface,
            geometry,
            theme,
            page,
            cursor_x: geometry.margin,
            cursor_y: geometry.content_top(),
            cover_page: None,
            decorator: None,
        }
    }

    /// Installs the hook called for every new page.
    pub fn set_decorator(&mut self, decorator: Box<dyn PageDecorator<S>>) {
        self.decorator = Some(decorator);
    }

    /// Records the current page as the cover (excluded from page numbering).
    pub fn mark_cover(&mut self) {
        self.cover_page = Some(self.page);
    }

    /// Index of the cover page, if one was recorded.
    pub fn cover_page(&self) -> Option<usize> {
        self.cover_page
    }

    /// Index of the page being drawn into.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Number of pages created so far.
    pub fn page_count(&self) -> usize {
        self.surface.page_count()
    }

    /// Page geometry of this document.
    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// The document palette.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Current horizontal draw position.
    pub fn cursor_x(&self) -> f64 {
        self.cursor_x
    }

    /// Current vertical draw position (top of the next primitive).
    pub fn cursor_y(&self) -> f64 {
        self.cursor_y
    }

    /// Moves the cursor to an absolute vertical position.
    pub fn set_cursor_y(&mut self, y: f64) {
        self.cursor_y = y;
    }

    /// Moves the cursor down by `dy` points.
    pub fn advance(&mut self, dy: f64) {
        self.cursor_y -= dy;
    }

    /// Left edge of the content column.
    pub fn left(&self) -> f64 {
        self.geometry.margin
    }

    /// Right edge of the content column.
    pub fn right(&self) -> f64 {
        self.geometry.width - self.geometry.margin
    }

    /// Width of the content column.
    pub fn content_width(&self) -> f64 {
        self.geometry.content_width()
    }

    /// Lowest y a primitive may draw down to.
    pub fn safe_bottom(&self) -> f64 {
        self.geometry.safe_bottom()
    }

    /// Whether `height` points still fit above the footer band.
    pub fn fits(&self, height: f64) -> bool {
        self.cursor_y - height >= self.safe_bottom()
    }

    /// Measures `text` with the surface's fonts.
    pub fn measure(&self, face: Face, text: &str, size: f64) -> f64 {
        self.surface.text_width(face, text, size)
    }

    /// Font metrics of the underlying surface.
    pub fn metrics(&self) -> &dyn TextMeasure {
        &self.surface
    }

    /// Wraps `text` to `max_width` with the surface's fonts.
    pub fn wrap(&self, text: &str, face: Face, size: f64, max_width: f64) -> Vec<String> {
        wrap_text(text, &self.surface, face, size, max_width)
    }

    /// Draws a text run on the current page.
    pub fn draw_text(&mut self, origin: Point, text: &str, style: TextStyle) {
        let page = self.page;
        self.surface.draw_text(page, origin, text, style);
    }

    /// Fills a rectangle on the current page.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let page = self.page;
        self.surface.fill_rect(page, rect, color);
    }

    /// Strokes a line on the current page.
    pub fn stroke_line(&mut self, from: Point, to: Point, thickness: f64, color: Color) {
        let page = self.page;
        self.surface.stroke_line(page, from, to, thickness, color);
    }

    /// Registers a jump target on the current page.
    pub fn link(&mut self, area: Rect, target_page: usize) {
        let page = self.page;
        self.surface.link(page, area, target_page);
    }

    /// Mutable access to the drawing surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Read access to the drawing surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Guarantees `height` points of vertical space, opening a new page
    /// otherwise. Returns whether a page break happened.
    ///
    /// Primitives call this with their full precomputed height before drawing,
    /// so no primitive is ever split across pages.
    pub fn ensure(&mut self, height: f64) -> bool {
        if self.fits(height) {
            return false;
        }
        debug!(
            "Page break: {:.1}pt needed, {:.1}pt left on page {}",
            height,
            self.cursor_y - self.safe_bottom(),
            self.page + 1
        );
        self.new_page();
        true
    }

    /// Appends a page, moves the cursor to its content top and runs the page
    /// decorator. Returns the new page index.
    pub fn new_page(&mut self) -> usize {
        self.page = self.surface.add_page();
        self.reset_cursor();

        if let Some(mut decorator) = self.decorator.take() {
            decorator.decorate(self);
            self.decorator = Some(decorator);
        }
        self.page
    }

    /// Re-selects an existing page and moves the cursor to its content top.
    ///
    /// Used by passes that revisit pages after content generation.
    pub fn select_page(&mut self, page: usize) {
        self.page = page;
        self.reset_cursor();
    }

    fn reset_cursor(&mut self) {
        self.cursor_x = self.geometry.margin;
        self.cursor_y = self.geometry.content_top();
    }

    /// Consumes the context and returns the surface.
    pub fn into_surface(self) -> S {
        self.surface
    }
}

impl<S: Surface + std::fmt::Debug> std::fmt::Debug for LayoutContext<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutContext")
            .field("surface", &self.surface)
            .field("geometry", &self.geometry)
            .field("page", &self.page)
            .field("cursor_x", &self.cursor_x)
            .field("cursor_y", &self.cursor_y)
            .field("cover_page", &self.cover_page)
            .field("decorated", &self.decorator.is_some())
            .finish()
    }
}
