use std::io::BufWriter;

use genpdf::error::{Context as _, Error};
use genpdf::style::Color;
use log::debug;
use printpdf::indices::{PdfLayerIndex, PdfPageIndex};
use printpdf::{IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use super::{Point, Rect, Surface, TextStyle};
use crate::error::ReportError;
use crate::fonts::{Face, FontSet, TextMeasure};
use crate::links::{self, PageLink};
use crate::toc::TocEntry;

const LAYER_NAME: &str = "Content";
const PT_TO_MM: f64 = 25.4 / 72.0;

fn mm(points: f64) -> Mm {
    Mm(points * PT_TO_MM)
}

fn pdf_point(point: Point) -> printpdf::Point {
    printpdf::Point::new(mm(point.x), mm(point.y))
}

fn pdf_color(color: Color) -> printpdf::Color {
    let unit = |value: u8| f64::from(value) / 255.0;
    match color {
        Color::Rgb(r, g, b) => {
            printpdf::Color::Rgb(printpdf::Rgb::new(unit(r), unit(g), unit(b), None))
        }
        Color::Cmyk(c, m, y, k) => printpdf::Color::Cmyk(printpdf::Cmyk::new(
            unit(c),
            unit(m),
            unit(y),
            unit(k),
            None,
        )),
        Color::Greyscale(value) => {
            printpdf::Color::Greyscale(printpdf::Greyscale::new(unit(value), None))
        }
    }
}

/// PDF backend built on `printpdf`.
///
/// Link annotations and the document outline are not supported by the
/// writer, so they are collected while drawing and added by [`finish`]
/// through a `lopdf` post-processing pass.
///
/// [`finish`]: PdfSurface::finish
pub struct PdfSurface {
    document: PdfDocumentReference,
    pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
    fonts: FontSet,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    width: f64,
    height: f64,
    links: Vec<PageLink>,
}

impl std::fmt::Debug for PdfSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfSurface")
            .field("pages", &self.pages.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .field("links", &self.links.len())
            .finish()
    }
}

impl PdfSurface {
    /// Creates a document with one blank page of `width` × `height` points and
    /// embeds both faces of `fonts`.
    pub fn new(title: &str, width: f64, height: f64, fonts: FontSet) -> Result<Self, Error> {
        let (document, page, layer) = PdfDocument::new(title, mm(width), mm(height), LAYER_NAME);
        let regular = document
            .add_external_font(fonts.regular_bytes())
            .context("Failed to embed regular font face")?;
        let bold = document
            .add_external_font(fonts.bold_bytes())
            .context("Failed to embed bold font face")?;

        Ok(Self {
            document,
            pages: vec![(page, layer)],
            fonts,
            regular,
            bold,
            width,
            height,
            links: Vec::new(),
        })
    }

    fn layer(&self, page: usize) -> Option<PdfLayerReference> {
        self.pages
            .get(page)
            .map(|(page, layer)| self.document.get_page(*page).get_layer(*layer))
    }

    /// Serializes the document, then adds the recorded jump targets and an
    /// outline mirroring `outline`.
    pub fn finish(self, outline: &[TocEntry]) -> Result<Vec<u8>, ReportError> {
        let Self {
            document, links, ..
        } = self;

        let mut writer = BufWriter::new(Vec::new());
        document
            .save(&mut writer)
            .context("Failed to serialize PDF document")
            .map_err(ReportError::Render)?;
        let bytes = writer
            .into_inner()
            .map_err(|err| ReportError::Io(err.into_error()))?;

        debug!(
            "Serialized {} bytes; adding {} links and {} outline entries",
            bytes.len(),
            links.len(),
            outline.len()
        );
        links::apply_links_and_outline(&bytes, &links, outline)
    }
}

impl TextMeasure for PdfSurface {
    fn text_width(&self, face: Face, text: &str, size: f64) -> f64 {
        self.fonts.text_width(face, text, size)
    }
}

impl Surface for PdfSurface {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn add_page(&mut self) -> usize {
        let (page, layer) = self
            .document
            .add_page(mm(self.width), mm(self.height), LAYER_NAME);
        self.pages.push((page, layer));
        self.pages.len() - 1
    }

    fn draw_text(&mut self, page: usize, origin: Point, text: &str, style: TextStyle) {
        let Some(layer) = self.layer(page) else {
            return;
        };
        let font = match style.face {
            Face::Regular => &self.regular,
            Face::Bold => &self.bold,
        };
        layer.set_fill_color(pdf_color(style.color));
        layer.use_text(text, style.size, mm(origin.x), mm(origin.y), font);
    }

    fn fill_rect(&mut self, page: usize, rect: Rect, color: Color) {
        let Some(layer) = self.layer(page) else {
            return;
        };
        let corners = [
            Point::new(rect.x, rect.y),
            Point::new(rect.right(), rect.y),
            Point::new(rect.right(), rect.top()),
            Point::new(rect.x, rect.top()),
        ];
        layer.set_fill_color(pdf_color(color));
        layer.add_shape(Line {
            points: corners
                .iter()
                .map(|corner| (pdf_point(*corner), false))
                .collect(),
            is_closed: true,
            has_fill: true,
            has_stroke: false,
            is_clipping_path: false,
        });
    }

    fn stroke_line(&mut self, page: usize, from: Point, to: Point, thickness: f64, color: Color) {
        let Some(layer) = self.layer(page) else {
            return;
        };
        layer.set_outline_color(pdf_color(color));
        layer.set_outline_thickness(thickness);
        layer.add_shape(Line {
            points: vec![(pdf_point(from), false), (pdf_point(to), false)],
            is_closed: false,
            has_fill: false,
            has_stroke: true,
            is_clipping_path: false,
        });
    }

    fn link(&mut self, page: usize, area: Rect, target_page: usize) {
        self.links.push(PageLink {
            page,
            area,
            target_page,
        });
    }
}
