//! Error type shared by the report builder and its backends.

use std::fmt;

/// Errors that abort a report build.
///
/// Problems scoped to a single form or facet (unknown identifiers, unanswered
/// questions, missing feedback) never surface here; they degrade the rendered
/// output instead.
#[derive(Debug)]
pub enum ReportError {
    /// The font faces could not be located or parsed.
    Font(genpdf::error::Error),
    /// The paged-document backend failed while drawing or serializing.
    Render(genpdf::error::Error),
    /// The serialized document could not be reopened to add links and outlines.
    Links(lopdf::Error),
    /// A link or outline entry refers to a page that was never created.
    MissingPage {
        /// The requested (1-indexed) page number.
        page_number: usize,
        /// Number of pages in the rendered document.
        page_count: usize,
    },
    /// A content pack or forms payload could not be parsed.
    Content(serde_json::Error),
    /// Reading inputs or writing output failed.
    Io(std::io::Error),
}

impl From<lopdf::Error> for ReportError {
    fn from(err: lopdf::Error) -> Self {
        Self::Links(err)
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Content(err)
    }
}

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Font(err) => write!(f, "Failed to initialize fonts: {err}"),
            Self::Render(err) => write!(f, "Failed to render document: {err}"),
            Self::Links(err) => write!(f, "Failed to add links to document: {err}"),
            Self::MissingPage {
                page_number,
                page_count,
            } => write!(
                f,
                "Link target page {} does not exist (document has {} pages)",
                page_number, page_count
            ),
            Self::Content(err) => write!(f, "Failed to parse content: {err}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Font(err) | Self::Render(err) => Some(err),
            Self::Links(err) => Some(err),
            Self::Content(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::MissingPage { .. } => None,
        }
    }
}
