//! Whole-page renderers built from the drawing primitives.

mod cover;
mod credits;
mod factor;
mod header;

pub use cover::{fit_title, render_cover, CoverContent};
pub use credits::render_credits;
pub use factor::{plan_outline, render_form, render_not_found, NOT_FOUND_TITLE};
pub use header::RunningHeader;
