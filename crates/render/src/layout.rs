//! Fixed A4 layout geometry.
//!
//! Coordinates are PDF points with the origin at the bottom-left corner of
//! the page. The layout is deliberately rigid: a centered title, a header
//! block at fixed pitch, a ruled item table between x = 50 and x = 540, and
//! a totals block.

use quotecraft_core::{DomainError, DomainResult};
use serde::Serialize;

pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;

/// Left edge of text and of the table rules.
pub const MARGIN_LEFT: f32 = 50.0;
/// Right edge of the table rules.
pub const TABLE_RIGHT: f32 = 540.0;

/// Column anchors: name is left-aligned, unit price and quantity centered,
/// amount right-aligned.
pub const NAME_X: f32 = 55.0;
pub const UNIT_PRICE_X: f32 = 255.0;
pub const QUANTITY_X: f32 = 360.0;
pub const AMOUNT_X: f32 = 535.0;

/// Vertical pitch of header lines and table rows.
pub const LINE_PITCH: f32 = 20.0;

/// Baseline of the centered title on the first page.
pub const TITLE_BASELINE: f32 = PAGE_HEIGHT - 50.0;
/// First baseline of the header block (company, tax id, ...).
pub const HEADER_BLOCK_TOP: f32 = PAGE_HEIGHT - 100.0;
/// Top cursor position on continuation pages.
pub const CONTINUATION_TOP: f32 = PAGE_HEIGHT - 50.0;
/// Rows never descend below this; reaching it starts a new page.
pub const BOTTOM_MARGIN: f32 = 60.0;

/// Accent color (RGB, 0..1) used to emphasize the grand total.
pub const ACCENT_COLOR: [f32; 3] = [0.72, 0.11, 0.11];

/// Title and body font sizes, range-checked to keep the fixed layout intact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FontStyles {
    title_size: f32,
    body_size: f32,
}

pub const TITLE_SIZE_RANGE: std::ops::RangeInclusive<f32> = 12.0..=30.0;
pub const BODY_SIZE_RANGE: std::ops::RangeInclusive<f32> = 8.0..=20.0;

impl FontStyles {
    pub fn new(title_size: f32, body_size: f32) -> DomainResult<Self> {
        if !TITLE_SIZE_RANGE.contains(&title_size) {
            return Err(DomainError::validation(format!(
                "title size {title_size} outside {:?}",
                TITLE_SIZE_RANGE
            )));
        }
        if !BODY_SIZE_RANGE.contains(&body_size) {
            return Err(DomainError::validation(format!(
                "body size {body_size} outside {:?}",
                BODY_SIZE_RANGE
            )));
        }
        Ok(Self {
            title_size,
            body_size,
        })
    }

    pub fn title_size(&self) -> f32 {
        self.title_size
    }

    pub fn body_size(&self) -> f32 {
        self.body_size
    }
}

impl Default for FontStyles {
    fn default() -> Self {
        Self {
            title_size: 18.0,
            body_size: 12.0,
        }
    }
}
