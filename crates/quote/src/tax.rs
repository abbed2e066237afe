use serde::{Deserialize, Serialize};

use quotecraft_core::{DomainError, DomainResult, round_half_up_div};

/// Fixed VAT rate applied to every quote.
pub const TAX_RATE_PERCENT: u64 = 5;

/// Whether entered amounts already include tax (decomposition) or exclude it
/// (addition). Selected once per render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxMode {
    TaxIncluded,
    TaxExcluded,
}

/// Net/tax/total split of a subtotal under a [`TaxMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub net: u64,
    pub tax: u64,
    pub total: u64,
}

impl TaxBreakdown {
    /// Decompose `subtotal` under `mode`.
    ///
    /// Rounding is round-half-up in exact integer arithmetic:
    /// `round(s * 0.05 / 1.05)` is `round(s / 21)` and `round(s * 0.05)` is
    /// `round(s / 20)`.
    pub fn compute(subtotal: u64, mode: TaxMode) -> DomainResult<Self> {
        match mode {
            TaxMode::TaxIncluded => {
                let tax = round_half_up_div(subtotal, 21);
                Ok(Self {
                    net: subtotal - tax,
                    tax,
                    total: subtotal,
                })
            }
            TaxMode::TaxExcluded => {
                let tax = round_half_up_div(subtotal, 20);
                let total = subtotal
                    .checked_add(tax)
                    .ok_or_else(|| DomainError::invariant("quote total overflow"))?;
                Ok(Self {
                    net: subtotal,
                    tax,
                    total,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn decomposes_tax_included_subtotal() {
        let b = TaxBreakdown::compute(1050, TaxMode::TaxIncluded).unwrap();
        assert_eq!(b.tax, 50);
        assert_eq!(b.net, 1000);
        assert_eq!(b.total, 1050);
    }

    #[test]
    fn adds_tax_to_excluded_subtotal() {
        let b = TaxBreakdown::compute(1000, TaxMode::TaxExcluded).unwrap();
        assert_eq!(b.tax, 50);
        assert_eq!(b.net, 1000);
        assert_eq!(b.total, 1050);
    }

    #[test]
    fn zero_subtotal_decomposes_to_zeroes() {
        for mode in [TaxMode::TaxIncluded, TaxMode::TaxExcluded] {
            let b = TaxBreakdown::compute(0, mode).unwrap();
            assert_eq!((b.net, b.tax, b.total), (0, 0, 0));
        }
    }

    #[test]
    fn half_boundaries_round_up() {
        // 10 * 0.05 = 0.5 -> 1
        let b = TaxBreakdown::compute(10, TaxMode::TaxExcluded).unwrap();
        assert_eq!(b.tax, 1);
        assert_eq!(b.total, 11);
    }

    #[test]
    fn excluded_total_overflow_is_an_invariant_error() {
        let err = TaxBreakdown::compute(u64::MAX, TaxMode::TaxExcluded).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn tax_mode_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&TaxMode::TaxIncluded).unwrap(),
            "\"tax_included\""
        );
        assert_eq!(
            serde_json::to_string(&TaxMode::TaxExcluded).unwrap(),
            "\"tax_excluded\""
        );
    }

    proptest! {
        #[test]
        fn net_plus_tax_equals_total(subtotal in 0u64..=1_000_000_000_000u64) {
            for mode in [TaxMode::TaxIncluded, TaxMode::TaxExcluded] {
                let b = TaxBreakdown::compute(subtotal, mode).unwrap();
                prop_assert_eq!(b.net + b.tax, b.total);
            }
        }

        #[test]
        fn included_mode_preserves_subtotal(subtotal in 0u64..=1_000_000_000_000u64) {
            let b = TaxBreakdown::compute(subtotal, TaxMode::TaxIncluded).unwrap();
            prop_assert_eq!(b.total, subtotal);
            prop_assert!(b.tax <= subtotal);
        }

        #[test]
        fn excluded_mode_preserves_subtotal_as_net(subtotal in 0u64..=1_000_000_000_000u64) {
            let b = TaxBreakdown::compute(subtotal, TaxMode::TaxExcluded).unwrap();
            prop_assert_eq!(b.net, subtotal);
        }
    }
}
