//! `quotecraft-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the error taxonomy and integer currency arithmetic shared by the ledger and
//! the renderer.

pub mod error;
pub mod money;

pub use error::{DomainError, DomainResult};
pub use money::{format_thousands, round_half_up_div};
