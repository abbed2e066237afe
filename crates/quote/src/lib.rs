//! `quotecraft-quote` — the quotation domain.
//!
//! A quote is an ordered ledger of line items plus free-form header fields.
//! The ledger supports append, wholesale clear, and subtotal; the tax module
//! decomposes the subtotal into net/tax/total under the selected tax mode.

pub mod header;
pub mod ledger;
pub mod line_item;
pub mod tax;

pub use header::QuoteHeader;
pub use ledger::LineItemLedger;
pub use line_item::{ItemDraft, LineItem};
pub use tax::{TAX_RATE_PERCENT, TaxBreakdown, TaxMode};
