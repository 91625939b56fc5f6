//! Report construction: configuration and the build driver.

use log::info;

use crate::content::ContentPack;
use crate::error::ReportError;
use crate::fonts::{self, FontSet};
use crate::forms::FormSubmission;
use crate::layout::{LayoutContext, PageGeometry};
use crate::pagination;
use crate::sections::{self, CoverContent, RunningHeader};
use crate::surface::{PdfSurface, Surface};
use crate::theme::Theme;
use crate::toc::{self, TocEntry, TocReservation};

/// Result of laying a report out on a surface.
#[derive(Debug)]
pub struct Rendering<S> {
    /// The surface holding every drawn page.
    pub surface: S,
    /// Outline recorded while drawing the factor pages.
    pub outline: Vec<TocEntry>,
    /// Pages reserved for the table of contents.
    pub toc: TocReservation,
    /// Index of the cover page.
    pub cover_page: Option<usize>,
    /// Number of pages the report spans.
    pub page_count: usize,
}

/// Builder for personality reports, pre-configured with the crate defaults.
#[derive(Debug)]
pub struct ReportBuilder {
    content: ContentPack,
    geometry: PageGeometry,
    theme: Theme,
    cover: CoverContent,
    credits: Vec<String>,
    fonts: Option<FontSet>,
}

impl ReportBuilder {
    /// Creates a builder rendering forms against `content`.
    pub fn new(content: ContentPack) -> Self {
        Self {
            content,
            geometry: PageGeometry::default(),
            theme: Theme::default(),
            cover: CoverContent::default(),
            credits: Vec::new(),
            fonts: None,
        }
    }

    /// Sets the report title shown on the cover and in the running header.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.cover.title = title.into();
        self
    }

    /// Sets the line shown under the cover title.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.cover.subtitle = subtitle.into();
        self
    }

    /// Sets the page size, margin and header/footer bands.
    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Sets the colour palette.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Replaces every cover text. The title set by [`with_title`] is overwritten.
    ///
    /// [`with_title`]: ReportBuilder::with_title
    pub fn with_cover(mut self, cover: CoverContent) -> Self {
        self.cover = cover;
        self
    }

    /// Sets the lines of the closing credits band; no band is drawn when empty.
    pub fn with_credits<I, L>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        self.credits = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Uses `fonts` instead of searching for the bundled faces.
    pub fn with_fonts(mut self, fonts: FontSet) -> Self {
        self.fonts = Some(fonts);
        self
    }

    /// The report title.
    pub fn title(&self) -> &str {
        &self.cover.title
    }

    /// Renders `forms` into PDF bytes.
    ///
    /// Only font and backend failures abort the build; unknown forms and
    /// unanswered questions degrade the output instead.
    pub fn build(mut self, forms: &[FormSubmission]) -> Result<Vec<u8>, ReportError> {
        let fonts = match self.fonts.take() {
            Some(fonts) => fonts,
            None => fonts::default_font_set().map_err(ReportError::Font)?,
        };
        let surface = PdfSurface::new(
            &self.cover.title,
            self.geometry.width,
            self.geometry.height,
            fonts,
        )
        .map_err(ReportError::Font)?;

        let rendering = self.render_on(surface, forms);
        let page_count = rendering.page_count;
        let bytes = rendering.surface.finish(&rendering.outline)?;

        info!(
            "Rendered report '{}': {} form(s), {} page(s), {} bytes",
            self.cover.title,
            forms.len(),
            page_count,
            bytes.len()
        );
        Ok(bytes)
    }

    /// Lays the report out on an arbitrary surface.
    ///
    /// The surface must hold exactly one blank page, which becomes the cover.
    pub fn render_on<S: Surface>(&self, surface: S, forms: &[FormSubmission]) -> Rendering<S> {
        let mut ctx = LayoutContext::new(surface, self.geometry, self.theme);
        sections::render_cover(&mut ctx, &self.cover);
        ctx.set_decorator(Box::new(RunningHeader::new(self.cover.title.clone())));

        let planned = sections::plan_outline(&self.content, forms);
        let reservation = toc::reserve_toc(&mut ctx, &planned);

        let mut outline = Vec::with_capacity(planned.len());
        for form in forms {
            sections::render_form(&mut ctx, &self.content, form, &mut outline);
        }

        let has_credits = self.credits.iter().any(|line| !line.trim().is_empty());
        if has_credits && reservation.pages.contains(&ctx.page()) {
            ctx.new_page();
        }
        sections::render_credits(&mut ctx, &self.credits);

        toc::backfill_toc(&mut ctx, &reservation, &outline);
        pagination::stamp_footers(&mut ctx);

        let cover_page = ctx.cover_page();
        let page_count = ctx.page_count();
        Rendering {
            surface: ctx.into_surface(),
            outline,
            toc: reservation,
            cover_page,
            page_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;

    #[test]
    fn empty_report_has_cover_and_toc() {
        let rendering =
            ReportBuilder::new(ContentPack::new()).render_on(RecordingSurface::new(), &[]);
        assert_eq!(rendering.page_count, 2);
        assert_eq!(rendering.cover_page, Some(0));
        assert_eq!(rendering.toc.pages, vec![1]);
        assert!(rendering.outline.is_empty());
    }

    #[test]
    fn credits_never_land_on_the_toc_page() {
        let rendering = ReportBuilder::new(ContentPack::new())
            .with_credits(["Equipe BFP"])
            .render_on(RecordingSurface::new(), &[]);
        assert_eq!(rendering.page_count, 3);
        assert_eq!(
            rendering.surface.find_text("Equipe BFP").map(|(page, _)| page),
            Some(2)
        );
    }

    #[test]
    fn title_feeds_cover_and_running_header() {
        let rendering = ReportBuilder::new(ContentPack::new())
            .with_title("Relatório de Teste")
            .render_on(RecordingSurface::new(), &[]);
        let pages: Vec<usize> = rendering
            .surface
            .texts()
            .filter(|(_, _, text)| *text == "Relatório de Teste")
            .map(|(page, _, _)| page)
            .collect();
        assert_eq!(pages, vec![0, 1]);
    }
}
