//! Font discovery and text measurement.
//!
//! Reports use two faces: a regular face for body text and a bold face for
//! headings, badges and TOC rows. [`FontSet`] keeps the raw face bytes (so the
//! PDF backend can embed them) together with a `genpdf` font cache that answers
//! width queries. Layout code only ever talks to the [`TextMeasure`] trait.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{FontCache, FontData, FontFamily};
use genpdf::style::Style;
use log::warn;

/// Name of the bundled font family.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "Roboto";

/// Environment variable that overrides the bundled font directory.
pub const FONTS_DIR_ENV: &str = "FACET_REPORT_FONTS_DIR";

const REGULAR_FILE: &str = "Roboto-Regular.ttf";
const BOLD_FILE: &str = "Roboto-Bold.ttf";

/// Font size used for width queries; widths scale linearly from it.
const MEASURE_REFERENCE_SIZE: u8 = 100;

const MM_TO_PT: f64 = 72.0 / 25.4;

struct SystemFamily {
    name: &'static str,
    regular: &'static str,
    bold: &'static str,
}

const SYSTEM_FAMILIES: &[SystemFamily] = &[
    SystemFamily {
        name: "DejaVu Sans",
        regular: "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        bold: "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    },
    SystemFamily {
        name: "Liberation Sans",
        regular: "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        bold: "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    },
    SystemFamily {
        name: "Arial",
        regular: "C:\\Windows\\Fonts\\arial.ttf",
        bold: "C:\\Windows\\Fonts\\arialbd.ttf",
    },
    SystemFamily {
        name: "Arial",
        regular: "/Library/Fonts/Arial.ttf",
        bold: "/Library/Fonts/Arial Bold.ttf",
    },
];

/// The two faces available to the layout engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    /// Body text.
    Regular,
    /// Headings, labels and badges.
    Bold,
}

/// Primitive width measurement of a string set in one of the report faces.
///
/// Widths are additive glyph advances; no shaping is performed.
pub trait TextMeasure {
    /// Returns the width, in points, of `text` set in `face` at `size` points.
    fn text_width(&self, face: Face, text: &str, size: f64) -> f64;
}

/// Fixed-advance metrics: every character is `advance * size` wide.
///
/// Useful for dry runs and for layout tests that must not depend on font files.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedMetrics {
    /// Advance of one regular character, as a fraction of the font size.
    pub regular_advance: f64,
    /// Advance of one bold character, as a fraction of the font size.
    pub bold_advance: f64,
}

impl Default for FixedMetrics {
    fn default() -> Self {
        Self {
            regular_advance: 0.5,
            bold_advance: 0.55,
        }
    }
}

impl TextMeasure for FixedMetrics {
    fn text_width(&self, face: Face, text: &str, size: f64) -> f64 {
        let advance = match face {
            Face::Regular => self.regular_advance,
            Face::Bold => self.bold_advance,
        };
        text.chars().count() as f64 * advance * size
    }
}

/// Regular and bold faces loaded from TrueType data.
pub struct FontSet {
    regular: Vec<u8>,
    bold: Vec<u8>,
    cache: FontCache,
}

impl std::fmt::Debug for FontSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontSet")
            .field("regular_len", &self.regular.len())
            .field("bold_len", &self.bold.len())
            .finish()
    }
}

impl FontSet {
    /// Builds a font set from raw TrueType bytes.
    pub fn from_bytes(regular: Vec<u8>, bold: Vec<u8>) -> Result<Self, Error> {
        let regular_data = FontData::new(regular.clone(), None)?;
        let bold_data = FontData::new(bold.clone(), None)?;
        let cache = FontCache::new(FontFamily {
            regular: regular_data.clone(),
            bold: bold_data.clone(),
            italic: regular_data,
            bold_italic: bold_data,
        });
        Ok(Self {
            regular,
            bold,
            cache,
        })
    }

    /// Loads the two faces from explicit file paths.
    pub fn from_files(regular: &Path, bold: &Path) -> Result<Self, Error> {
        let regular_bytes = read_font_file(regular, "regular")?;
        let bold_bytes = read_font_file(bold, "bold")?;
        Self::from_bytes(regular_bytes, bold_bytes)
    }

    /// Raw bytes of the regular face.
    pub fn regular_bytes(&self) -> &[u8] {
        &self.regular
    }

    /// Raw bytes of the bold face.
    pub fn bold_bytes(&self) -> &[u8] {
        &self.bold
    }
}

impl TextMeasure for FontSet {
    fn text_width(&self, face: Face, text: &str, size: f64) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        let mut style = Style::new().with_font_size(MEASURE_REFERENCE_SIZE);
        if face == Face::Bold {
            style.set_bold();
        }
        let width: printpdf::Mm = style.str_width(&self.cache, text).into();
        width.0 * MM_TO_PT * size / f64::from(MEASURE_REFERENCE_SIZE)
    }
}

fn read_font_file(path: &Path, style: &str) -> Result<Vec<u8>, Error> {
    fs::read(path).map_err(|err| {
        Error::new(
            format!(
                "Failed to read {} font at {}: {}",
                style,
                path.display(),
                err
            ),
            err,
        )
    })
}

fn font_directory_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(path) = env::var(FONTS_DIR_ENV) {
        if !path.trim().is_empty() {
            candidates.push(PathBuf::from(path));
        }
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            let candidate = bin_dir.join("assets/fonts");
            if !candidates.iter().any(|existing| existing == &candidate) {
                candidates.push(candidate);
            }
        }
    }

    let manifest_candidate = bundled_fonts_source_dir();
    if !candidates
        .iter()
        .any(|existing| existing == &manifest_candidate)
    {
        candidates.push(manifest_candidate);
    }

    candidates
}

/// Directory inside the crate where the bundled faces are expected.
pub fn bundled_fonts_source_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts")
}

fn missing_font_files(path: &Path) -> Vec<&'static str> {
    [REGULAR_FILE, BOLD_FILE]
        .into_iter()
        .filter(|name| !path.join(name).is_file())
        .collect()
}

fn resolve_font_directory() -> Result<PathBuf, Error> {
    let mut attempts = Vec::new();

    for candidate in font_directory_candidates() {
        let exists = candidate.is_dir();
        let missing = missing_font_files(&candidate);

        if exists && missing.is_empty() {
            return Ok(candidate);
        }

        let reason = if !exists {
            "directory missing".to_owned()
        } else {
            format!("missing files [{}]", missing.join(", "))
        };
        attempts.push(format!("{} ({})", candidate.display(), reason));
    }

    Err(Error::new(
        format!(
            "Unable to locate bundled font directory. Checked: {}. See assets/fonts/README.md or set {}.",
            attempts.join(", "),
            FONTS_DIR_ENV
        ),
        io::Error::new(io::ErrorKind::NotFound, "bundled fonts directory not found"),
    ))
}

fn system_font_set() -> Result<FontSet, Error> {
    for family in SYSTEM_FAMILIES {
        let regular = Path::new(family.regular);
        let bold = Path::new(family.bold);
        if regular.is_file() && bold.is_file() {
            let fonts = FontSet::from_files(regular, bold)?;
            warn!(
                "Bundled '{}' fonts unavailable; falling back to system '{}' family.",
                DEFAULT_FONT_FAMILY_NAME, family.name
            );
            return Ok(fonts);
        }
    }

    Err(Error::new(
        "No system fallback font family found",
        io::Error::new(io::ErrorKind::NotFound, "system fonts not found"),
    ))
}

fn fonts_missing(err: &Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::IoError(io_err)
            if io_err.kind() == io::ErrorKind::NotFound
                || io_err.kind() == io::ErrorKind::PermissionDenied
    )
}

/// Loads the bundled Roboto faces, falling back to a known system family.
pub fn default_font_set() -> Result<FontSet, Error> {
    let bundled = resolve_font_directory()
        .and_then(|dir| FontSet::from_files(&dir.join(REGULAR_FILE), &dir.join(BOLD_FILE)));

    match bundled {
        Ok(fonts) => Ok(fonts),
        Err(err) if fonts_missing(&err) => system_font_set().map_err(|fallback_err| {
            Error::new(
                format!(
                    "Bundled fonts unavailable ({}) and system fallback failed: {}",
                    err, fallback_err
                ),
                io::Error::new(io::ErrorKind::NotFound, "default fonts are not available"),
            )
        }),
        Err(err) => Err(err),
    }
}

/// Indicates whether [`default_font_set`] can find a usable pair of faces.
pub fn default_fonts_available() -> bool {
    resolve_font_directory().is_ok()
        || SYSTEM_FAMILIES
            .iter()
            .any(|family| Path::new(family.regular).is_file() && Path::new(family.bold).is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_metrics_scale_with_size_and_face() {
        let metrics = FixedMetrics::default();
        assert_eq!(metrics.text_width(Face::Regular, "abcd", 10.0), 20.0);
        assert!(
            metrics.text_width(Face::Bold, "abcd", 10.0)
                > metrics.text_width(Face::Regular, "abcd", 10.0)
        );
        assert_eq!(metrics.text_width(Face::Regular, "", 10.0), 0.0);
    }

    #[test]
    fn counts_characters_not_bytes() {
        let metrics = FixedMetrics::default();
        assert_eq!(metrics.text_width(Face::Regular, "ção", 10.0), 15.0);
    }

    #[test]
    fn missing_directory_reports_search_paths() {
        let missing = missing_font_files(Path::new("/__facet_report_missing_fonts__"));
        assert_eq!(missing, vec![REGULAR_FILE, BOLD_FILE]);
    }
}
