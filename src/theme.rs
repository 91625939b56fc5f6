//! Colour palette shared by every drawing primitive.

use genpdf::style::Color;

use crate::scoring::Level;

/// Fixed palette used throughout a report.
///
/// The theme is read-only once a build starts; primitives only borrow it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    /// Banner fills, headings and TOC factor rows.
    pub primary: Color,
    /// Accent bars and section labels.
    pub accent: Color,
    /// Secondary text such as headers, footers and leader dots.
    pub muted: Color,
    /// Divider strokes.
    pub divider: Color,
    /// Neutral fills (informational callouts, credits band).
    pub background: Color,
    /// Card fills.
    pub card: Color,
    /// Warning accents.
    pub danger: Color,
    /// Warning callout fill.
    pub danger_background: Color,
    /// Body text.
    pub text: Color,
    /// Text drawn over `primary` fills.
    pub on_primary: Color,
    /// Badge colour for [`Level::Low`].
    pub level_low: Color,
    /// Badge colour for [`Level::Medium`].
    pub level_medium: Color,
    /// Badge colour for [`Level::High`].
    pub level_high: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Rgb(0x1f, 0x3a, 0x5f),
            accent: Color::Rgb(0x2a, 0x9d, 0x8f),
            muted: Color::Rgb(0x6b, 0x72, 0x80),
            divider: Color::Rgb(0xd1, 0xd5, 0xdb),
            background: Color::Rgb(0xf3, 0xf4, 0xf6),
            card: Color::Rgb(0xf8, 0xfa, 0xfc),
            danger: Color::Rgb(0xc0, 0x39, 0x2b),
            danger_background: Color::Rgb(0xfd, 0xec, 0xea),
            text: Color::Rgb(0x1f, 0x29, 0x37),
            on_primary: Color::Rgb(0xff, 0xff, 0xff),
            level_low: Color::Rgb(0x34, 0x98, 0xdb),
            level_medium: Color::Rgb(0xe6, 0x7e, 0x22),
            level_high: Color::Rgb(0x8e, 0x44, 0xad),
        }
    }
}

impl Theme {
    /// Returns the badge colour associated with a classification level.
    pub fn level_color(&self, level: Level) -> Color {
        match level {
            Level::Low => self.level_low,
            Level::Medium => self.level_medium,
            Level::High => self.level_high,
        }
    }
}
