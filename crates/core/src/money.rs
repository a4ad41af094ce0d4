//! Money bounds shared by catalogue validation and order settlement.
//!
//! Prices are stored as `NUMERIC(12, 2)`. Order totals are capped well below
//! the range of `i64` loyalty points.

use rust_decimal::Decimal;
use thiserror::Error;

/// Digits kept after the decimal point.
pub const PRICE_SCALE: u32 = 2;

/// Exclusive upper bound for a unit price (10^10).
pub const MAX_PRICE: Decimal = Decimal::from_parts(0x540B_E400, 0x2, 0, false, 0);

/// Exclusive upper bound for an order total (10^15).
pub const MAX_ORDER_TOTAL: Decimal = Decimal::from_parts(0xA4C6_8000, 0x3_8D7E, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("price must not be negative")]
    Negative,
    #[error("price must have at most 2 decimal places")]
    TooPrecise,
    #[error("price must be below 10000000000")]
    TooLarge,
}

/// Check that a unit price can be stored without rounding.
///
/// # Errors
///
/// Returns the first [`PriceError`] the price violates.
pub fn check_price(price: Decimal) -> Result<(), PriceError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(PriceError::Negative);
    }
    if price.normalize().scale() > PRICE_SCALE {
        return Err(PriceError::TooPrecise);
    }
    if price >= MAX_PRICE {
        return Err(PriceError::TooLarge);
    }
    Ok(())
}
