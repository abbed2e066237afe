//! Render error model.

use quotecraft_core::DomainError;
use thiserror::Error;

/// Failure of a render call. No partial document is ever returned on this
/// path; a missing font asset is not an error (see
/// [`FontResolution`](crate::FontResolution)).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Totals arithmetic failed (e.g. the grand total overflowed).
    #[error("quote arithmetic failed: {0}")]
    Arithmetic(#[from] DomainError),
}
