//! Money calculation utilities using rust_decimal for precision
//!
//! Prices travel as f64 on the wire; every sum is computed in `Decimal`
//! and rounded once at the end, so float error never accumulates across
//! line items.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert an f64 price to Decimal
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Convert a Decimal back to f64, rounded to cents
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp(DECIMAL_PLACES)
        .to_f64()
        .unwrap_or(0.0)
}

/// quantity × unit price for one line
pub fn line_total(price: f64, quantity: i32) -> Decimal {
    to_decimal(price) * Decimal::from(quantity)
}

/// Sum of (price, quantity) lines, rounded to cents; 0.0 for no lines
pub fn order_total(lines: impl IntoIterator<Item = (f64, i32)>) -> f64 {
    let total: Decimal = lines
        .into_iter()
        .map(|(price, quantity)| line_total(price, quantity))
        .sum();
    to_f64(total)
}
