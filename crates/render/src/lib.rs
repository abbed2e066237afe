//! `quotecraft-render` — fixed-layout PDF rendering of a quote.
//!
//! Pipeline: resolve the typeface (with graceful fallback), lay the quote out
//! onto A4 pages, assemble the PDF. The render call is a pure function of its
//! inputs and returns complete document bytes plus a font-resolution note.

pub mod error;
pub mod fonts;
pub mod layout;
pub mod renderer;

pub use error::RenderError;
pub use fonts::{FontResolution, FontSource};
pub use layout::FontStyles;
pub use renderer::{RenderedQuote, render_quote};

use chrono::NaiveDate;

/// Content type of rendered documents.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Download filename derived from the quote date.
pub fn suggested_filename(date: NaiveDate) -> String {
    format!("quote_{date}.pdf")
}
