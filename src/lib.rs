//! Paginated personality report engine.
//!
//! Submitted questionnaire forms are scored against an externally authored
//! [`ContentPack`] and laid out as a multi-page PDF: a cover, a table of
//! contents with internal links, one section per factor with a scored card per
//! facet, a closing credits band and `N / TOTAL` footers.
//!
//! ```no_run
//! use facet_report::{ContentPack, FormSubmission, ReportBuilder};
//!
//! # fn main() -> Result<(), facet_report::ReportError> {
//! let content = ContentPack::from_path("demos/content_pack.json")?;
//! let forms = [FormSubmission::new("neuroticismo-v1").with_answer("n1", 4)];
//! let pdf = ReportBuilder::new(content).build(&forms)?;
//! std::fs::write("relatorio.pdf", pdf)?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod content;
pub mod error;
pub mod fonts;
pub mod forms;
pub mod layout;
pub mod links;
pub mod pagination;
pub mod primitives;
pub mod scoring;
pub mod sections;
pub mod surface;
pub mod text;
pub mod theme;
pub mod toc;

pub use builder::{ReportBuilder, Rendering};
pub use content::{ContentPack, FacetContent, FactorContent, FeedbackContent, Question};
pub use error::ReportError;
pub use fonts::{Face, FontSet, TextMeasure};
pub use forms::{AnswerMap, AnswerValue, FormSubmission};
pub use layout::{LayoutContext, PageDecorator, PageGeometry};
pub use scoring::{FacetScore, FactorKey, FactorSummary, Level};
pub use surface::{PdfSurface, RecordingSurface, Surface};
pub use theme::Theme;
pub use toc::{TocEntry, TocFacet};
