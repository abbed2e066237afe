use serde::{Deserialize, Serialize};

use quotecraft_core::{DomainError, DomainResult};

use crate::line_item::{ItemDraft, LineItem};

/// Ordered, append-only (until explicitly cleared) collection of quote line
/// items. Single-writer, single-reader within one session; owned explicitly
/// by the session rather than living in ambient state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemLedger {
    items: Vec<LineItem>,
}

impl LineItemLedger {
    /// Create an empty ledger (session start).
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the draft and append the resulting item at the end.
    ///
    /// On any error the ledger is unchanged. The running subtotal is checked
    /// here so that [`subtotal`](Self::subtotal) can never overflow.
    pub fn append(&mut self, draft: ItemDraft) -> DomainResult<()> {
        let item = LineItem::new(draft)?;
        self.subtotal()
            .checked_add(item.amount())
            .ok_or_else(|| DomainError::invariant("quote subtotal overflow"))?;
        self.items.push(item);
        Ok(())
    }

    /// Empty the sequence unconditionally.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of all line amounts; 0 for an empty ledger.
    ///
    /// Cannot overflow: `append` rejects items that would push the sum past
    /// `u64::MAX`.
    pub fn subtotal(&self) -> u64 {
        self.items.iter().map(LineItem::amount).sum()
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
