//! Subtotal, tax and total arithmetic for a single order.
//!
//! All functions are exact: `tax_for(dec!(11.00), dec!(0.08))` is `0.8800`,
//! which compares equal to `0.88`. They return `None` instead of panicking
//! when a result does not fit in a `Decimal`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::calculations::common::clamp_non_negative;

/// Sales tax rate applied when no other rate is configured.
pub const DEFAULT_TAX_RATE: Decimal = dec!(0.08);

/// Largest price a catalog accepts. Three such prices taxed at 100% stay far
/// inside `Decimal`'s range.
pub const MAX_PRICE: Decimal = dec!(1000000000000);

/// Tax owed on `subtotal` at `rate`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tray_core::calculations::pricing::{DEFAULT_TAX_RATE, tax_for};
///
/// assert_eq!(tax_for(dec!(11.50), DEFAULT_TAX_RATE), Some(dec!(0.92)));
/// ```
pub fn tax_for(
    subtotal: Decimal,
    rate: Decimal,
) -> Option<Decimal> {
    subtotal.checked_mul(rate)
}

/// Order total: subtotal plus tax.
pub fn total_for(
    subtotal: Decimal,
    tax: Decimal,
) -> Option<Decimal> {
    subtotal.checked_add(tax)
}

/// Result of swapping one course's price inside a running subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceReplacement {
    pub subtotal: Decimal,
    /// True when removing `previous` would have taken the subtotal below zero.
    pub clamped: bool,
}

/// Removes `previous` (if any) from `subtotal` and adds `next` (if any).
///
/// The intermediate value is clamped at zero, so a bookkeeping error can
/// never surface as a negative amount.
pub fn replace_price(
    subtotal: Decimal,
    previous: Option<Decimal>,
    next: Option<Decimal>,
) -> Option<PriceReplacement> {
    let (without_previous, clamped) =
        clamp_non_negative(subtotal.checked_sub(previous.unwrap_or(Decimal::ZERO))?);

    Some(PriceReplacement {
        subtotal: without_previous.checked_add(next.unwrap_or(Decimal::ZERO))?,
        clamped,
    })
}
