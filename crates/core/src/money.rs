//! Integer currency arithmetic.
//!
//! All monetary values are non-negative whole currency units (`u64`). Display
//! formatting uses thousands separators and no decimal places; rounded
//! division is exact integer arithmetic, never floating point.

/// Round `numer / denom` to the nearest integer, ties rounding up.
///
/// Implemented as `(2a + b) / 2b` in 128-bit arithmetic so it cannot overflow
/// for any `u64` inputs.
///
/// # Panics
///
/// Panics if `denom` is zero.
pub fn round_half_up_div(numer: u64, denom: u64) -> u64 {
    assert!(denom != 0, "division by zero");
    let n = numer as u128;
    let d = denom as u128;
    ((2 * n + d) / (2 * d)) as u64
}

/// Format a whole currency amount with thousands separators: `1234567` →
/// `"1,234,567"`.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let first_group = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - first_group) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
