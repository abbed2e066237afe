use serde::{Deserialize, Serialize};

use quotecraft_core::{DomainError, DomainResult};

/// Input record from the form layer: pre-validated for type and positivity
/// except the name, whose non-emptiness the ledger must still check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    /// Price per unit in whole currency units.
    pub unit_price: u64,
    pub quantity: u32,
}

/// A single quote line. Immutable after construction: the amount is derived
/// from its inputs exactly once and the item supports no edits, only append
/// to and wholesale clear of the owning ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    name: String,
    unit_price: u64,
    quantity: u32,
    amount: u64,
}

impl LineItem {
    /// Validate a draft and derive the amount (`unit_price * quantity`).
    pub fn new(draft: ItemDraft) -> DomainResult<Self> {
        if draft.name.trim().is_empty() {
            return Err(DomainError::validation("line item name must not be empty"));
        }
        if draft.quantity == 0 {
            return Err(DomainError::validation(
                "line item quantity must be positive",
            ));
        }
        let amount = draft
            .unit_price
            .checked_mul(u64::from(draft.quantity))
            .ok_or_else(|| DomainError::invariant("line item amount overflow"))?;

        Ok(Self {
            name: draft.name,
            unit_price: draft.unit_price,
            quantity: draft.quantity,
            amount,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> u64 {
        self.unit_price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Derived value: `unit_price * quantity`.
    pub fn amount(&self) -> u64 {
        self.amount
    }
}
