//! Fixed-layout PDF assembly.
//!
//! `render_quote` is a pure function of (header, items, tax mode, styles,
//! font source): identical inputs produce byte-identical documents. Pages are
//! built as content streams first; object ids are allocated monotonically and
//! the page tree is written once the page count is known.

use std::collections::BTreeSet;

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str};

use quotecraft_core::{DomainError, format_thousands};
use quotecraft_quote::{LineItem, QuoteHeader, TAX_RATE_PERCENT, TaxBreakdown, TaxMode};

use crate::error::RenderError;
use crate::fonts::{self, FONT_RES_NAME, FontResolution, FontSource, LoadedFont};
use crate::layout::{
    ACCENT_COLOR, AMOUNT_X, BOTTOM_MARGIN, CONTINUATION_TOP, FontStyles, HEADER_BLOCK_TOP,
    LINE_PITCH, MARGIN_LEFT, NAME_X, PAGE_HEIGHT, PAGE_WIDTH, QUANTITY_X, TABLE_RIGHT,
    TITLE_BASELINE, UNIT_PRICE_X,
};

/// Gap between the last table row and the totals block.
const TOTALS_GAP: f32 = 40.0;
/// Right edge for the totals labels.
const TOTALS_LABEL_X: f32 = 430.0;

/// A successfully rendered document.
#[derive(Debug, Clone)]
pub struct RenderedQuote {
    /// Complete PDF bytes, suitable for direct download.
    pub bytes: Vec<u8>,
    pub pages: usize,
    /// How the typeface was obtained; `FallbackUsed` is a warning the caller
    /// should surface.
    pub font: FontResolution,
}

/// Render a quote document.
///
/// The ledger snapshot is taken as a slice in ledger order; the tax
/// decomposition is computed here from the item amounts.
pub fn render_quote(
    header: &QuoteHeader,
    items: &[LineItem],
    tax_mode: TaxMode,
    styles: &FontStyles,
    font_source: &FontSource,
) -> Result<RenderedQuote, RenderError> {
    let subtotal = items
        .iter()
        .try_fold(0u64, |acc, item| acc.checked_add(item.amount()))
        .ok_or_else(|| DomainError::invariant("quote subtotal overflow"))?;
    let breakdown = TaxBreakdown::compute(subtotal, tax_mode)?;

    let header_lines = [
        format!("Company: {}", header.company),
        format!("Tax ID: {}", header.tax_id),
        format!("Phone: {}", header.phone),
        format!("E-Mail: {}", header.email),
        format!("Date: {}", header.date),
    ];
    let tax_label = format!("Tax ({TAX_RATE_PERCENT}%)");
    let totals = [
        ("Net", format_thousands(breakdown.net)),
        (tax_label.as_str(), format_thousands(breakdown.tax)),
        ("Total", format_thousands(breakdown.total)),
    ];

    let mut used: BTreeSet<char> = header.title.chars().collect();
    for line in &header_lines {
        used.extend(line.chars());
    }
    for cell in ["Item", "Unit Price", "Qty", "Amount"] {
        used.extend(cell.chars());
    }
    for item in items {
        used.extend(item.name().chars());
        used.extend(format_thousands(item.unit_price()).chars());
        used.extend(item.quantity().to_string().chars());
        used.extend(format_thousands(item.amount()).chars());
    }
    for (label, value) in &totals {
        used.extend(label.chars());
        used.extend(value.chars());
    }

    let (font, resolution) = fonts::resolve(font_source, &used);

    let mut page_contents: Vec<Content> = Vec::new();
    let mut content = Content::new();

    // First page: centered title, then the header block at fixed pitch.
    show_centered(
        &mut content,
        &font,
        styles.title_size(),
        PAGE_WIDTH / 2.0,
        TITLE_BASELINE,
        &header.title,
    );
    let mut y = HEADER_BLOCK_TOP;
    for line in &header_lines {
        show_left(&mut content, &font, styles.body_size(), MARGIN_LEFT, y, line);
        y -= LINE_PITCH;
    }

    y -= LINE_PITCH;
    y = draw_table_header(&mut content, &font, styles.body_size(), y);

    for item in items {
        if y - LINE_PITCH < BOTTOM_MARGIN {
            page_contents.push(std::mem::replace(&mut content, Content::new()));
            y = draw_table_header(&mut content, &font, styles.body_size(), CONTINUATION_TOP);
        }
        y -= LINE_PITCH;
        let body = styles.body_size();
        show_left(&mut content, &font, body, NAME_X, y, item.name());
        show_centered(
            &mut content,
            &font,
            body,
            UNIT_PRICE_X,
            y,
            &format_thousands(item.unit_price()),
        );
        show_centered(
            &mut content,
            &font,
            body,
            QUANTITY_X,
            y,
            &item.quantity().to_string(),
        );
        show_right(
            &mut content,
            &font,
            body,
            AMOUNT_X,
            y,
            &format_thousands(item.amount()),
        );
    }

    // Totals block; moved to a fresh page as a whole if it does not fit.
    if y - (TOTALS_GAP + 2.0 * LINE_PITCH) < BOTTOM_MARGIN {
        page_contents.push(std::mem::replace(&mut content, Content::new()));
        y = CONTINUATION_TOP;
    }
    y -= TOTALS_GAP;
    rule(&mut content, y + 10.0);
    for (i, (label, value)) in totals.iter().enumerate() {
        let emphasized = i == totals.len() - 1;
        let size = if emphasized {
            styles.title_size()
        } else {
            styles.body_size()
        };
        if emphasized {
            content.set_fill_rgb(ACCENT_COLOR[0], ACCENT_COLOR[1], ACCENT_COLOR[2]);
        }
        show_right(&mut content, &font, size, TOTALS_LABEL_X, y, label);
        show_right(&mut content, &font, size, AMOUNT_X, y, value);
        if emphasized {
            content.set_fill_rgb(0.0, 0.0, 0.0);
        }
        y -= LINE_PITCH;
    }
    page_contents.push(content);

    Ok(assemble(page_contents, &font, resolution))
}

fn assemble(page_contents: Vec<Content>, font: &LoadedFont, resolution: FontResolution) -> RenderedQuote {
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = move || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let font_ref = font.register(&mut pdf, &mut alloc);

    let n = page_contents.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, c) in page_contents.into_iter().enumerate() {
        let raw = c.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&raw, 6);
        pdf.stream(content_ids[i], &compressed)
            .filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT))
            .parent(pages_id)
            .contents(content_ids[i]);
        page.resources()
            .fonts()
            .pair(Name(FONT_RES_NAME), font_ref);
    }

    RenderedQuote {
        bytes: pdf.finish(),
        pages: n,
        font: resolution,
    }
}

/// Horizontal rule across the table width.
fn rule(content: &mut Content, y: f32) {
    content.move_to(MARGIN_LEFT, y);
    content.line_to(TABLE_RIGHT, y);
    content.stroke();
}

/// Ruled column-header band. Repeated at the top of continuation pages so
/// every page of table rows is self-describing.
fn draw_table_header(content: &mut Content, font: &LoadedFont, body_size: f32, y: f32) -> f32 {
    rule(content, y);
    let y = y - LINE_PITCH;
    show_left(content, font, body_size, NAME_X, y, "Item");
    show_centered(content, font, body_size, UNIT_PRICE_X, y, "Unit Price");
    show_centered(content, font, body_size, QUANTITY_X, y, "Qty");
    show_right(content, font, body_size, AMOUNT_X, y, "Amount");
    let y = y - 10.0;
    rule(content, y);
    y
}

fn show_left(content: &mut Content, font: &LoadedFont, size: f32, x: f32, y: f32, text: &str) {
    content
        .begin_text()
        .set_font(Name(FONT_RES_NAME), size)
        .next_line(x, y)
        .show(Str(&font.encode(text)))
        .end_text();
}

fn show_centered(content: &mut Content, font: &LoadedFont, size: f32, center_x: f32, y: f32, text: &str) {
    let x = center_x - font.text_width(text, size) / 2.0;
    show_left(content, font, size, x, y, text);
}

fn show_right(content: &mut Content, font: &LoadedFont, size: f32, right_x: f32, y: f32, text: &str) {
    let x = right_x - font.text_width(text, size);
    show_left(content, font, size, x, y, text);
}
