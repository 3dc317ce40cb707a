//! Shared decimal helpers for order pricing.
//!
//! The order model keeps exact decimal values; rounding to whole cents is
//! only applied where amounts leave the model for display.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to whole cents, with midpoints rounded away from
/// zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tray_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(0.924)), dec!(0.92));
/// assert_eq!(round_half_up(dec!(0.925)), dec!(0.93));
/// assert_eq!(round_half_up(dec!(-0.925)), dec!(-0.93));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps a value at zero.
///
/// Returns the clamped value and whether clamping happened, so callers can
/// report the inconsistency that produced a negative amount.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tray_core::calculations::common::clamp_non_negative;
///
/// assert_eq!(clamp_non_negative(dec!(1.50)), (dec!(1.50), false));
/// assert_eq!(clamp_non_negative(dec!(-0.01)), (dec!(0), true));
/// ```
pub fn clamp_non_negative(value: Decimal) -> (Decimal, bool) {
    if value.is_sign_negative() && !value.is_zero() {
        (Decimal::ZERO, true)
    } else {
        (value, false)
    }
}
