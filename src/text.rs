//! Greedy line breaking and justification.

use crate::fonts::{Face, TextMeasure};

/// Leading ratio applied to every font size.
pub const LEADING: f64 = 1.35;

/// Height of one line of text set at `size` points.
pub fn line_height(size: f64) -> f64 {
    size * LEADING
}

/// Wraps `text` into lines no wider than `max_width`.
///
/// Tokens are split on whitespace and packed greedily. A token that is wider
/// than `max_width` on its own is placed alone on a line and allowed to
/// overflow; tokens are never broken. Empty or all-whitespace input yields no
/// lines.
pub fn wrap_text(
    text: &str,
    measure: &dyn TextMeasure,
    face: Face,
    size: f64,
    max_width: f64,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for token in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(token);
            continue;
        }

        let candidate = format!("{current} {token}");
        if measure.text_width(face, &candidate, size) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, token.to_owned()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// A single line of a justified paragraph.
#[derive(Clone, Debug, PartialEq)]
pub struct JustifiedLine {
    /// Words on the line, in order.
    pub words: Vec<String>,
    /// Horizontal offset of each word from the line start.
    pub offsets: Vec<f64>,
    /// Whether the inter-word gaps were stretched to reach the right edge.
    pub stretched: bool,
}

impl JustifiedLine {
    /// Joins the words with single spaces.
    pub fn text(&self) -> String {
        self.words.join(" ")
    }
}

/// Packs `text` into lines and computes word offsets for full justification.
///
/// Lines are packed exactly as [`wrap_text`] packs them. Every line except the
/// last one, and except lines holding a single word, distributes its slack
/// evenly across its inter-word gaps so the right edge is flush. The last line
/// and single-word lines keep natural spacing.
pub fn justify_text(
    text: &str,
    measure: &dyn TextMeasure,
    face: Face,
    size: f64,
    max_width: f64,
) -> Vec<JustifiedLine> {
    let lines = wrap_text(text, measure, face, size, max_width);
    let space = measure.text_width(face, " ", size);
    let last = lines.len().saturating_sub(1);

    lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            let words: Vec<String> = line.split(' ').map(str::to_owned).collect();
            let widths: Vec<f64> = words
                .iter()
                .map(|word| measure.text_width(face, word, size))
                .collect();
            let gaps = words.len().saturating_sub(1);
            let stretched = index != last && gaps > 0;

            let gap = if stretched {
                let used: f64 = widths.iter().sum();
                ((max_width - used) / gaps as f64).max(space)
            } else {
                space
            };

            let mut offsets = Vec::with_capacity(words.len());
            let mut x = 0.0;
            for width in &widths {
                offsets.push(x);
                x += width + gap;
            }

            JustifiedLine {
                words,
                offsets,
                stretched,
            }
        })
        .collect()
}

/// Truncates `text` so that, followed by `suffix`, it fits in `max_width`.
pub fn truncate_to_width(
    text: &str,
    suffix: &str,
    measure: &dyn TextMeasure,
    face: Face,
    size: f64,
    max_width: f64,
) -> String {
    if measure.text_width(face, text, size) <= max_width {
        return text.to_owned();
    }

    let mut kept: String = text.to_owned();
    while !kept.is_empty() {
        kept.pop();
        let candidate = format!("{}{}", kept.trim_end(), suffix);
        if measure.text_width(face, &candidate, size) <= max_width {
            return candidate;
        }
    }
    suffix.to_owned()
}
