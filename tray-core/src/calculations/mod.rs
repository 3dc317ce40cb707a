//! Price calculations for an in-progress order.
//!
//! The order model stays exact; [`common::round_half_up`] is for callers
//! that need whole cents for display.

pub mod common;
pub mod pricing;

pub use pricing::{
    DEFAULT_TAX_RATE, MAX_PRICE, PriceReplacement, replace_price, tax_for, total_for,
};
