//! Cart validation and settlement arithmetic.
//!
//! These rules are applied by the order placement workflow in the API crate
//! while it holds row locks on the products being bought. Keeping them here
//! lets them be tested without a database.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;

use crate::money::MAX_ORDER_TOTAL;
use crate::types::ProductId;

/// One requested line of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CartLine {
    /// Product being bought.
    #[serde(rename = "id")]
    pub product_id: ProductId,
    /// Units requested. Omitted quantities mean one unit.
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

const fn default_quantity() -> i32 {
    1
}

/// Reasons a cart cannot be settled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    #[error("Order items required")]
    Empty,

    #[error("Quantity for product {product_id} must be at least 1")]
    InvalidQuantity { product_id: ProductId, quantity: i32 },

    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: i32,
        available: i32,
    },

    #[error("Order total must be below {}", MAX_ORDER_TOTAL)]
    TotalTooLarge,
}

/// Check a cart before anything is written.
///
/// # Errors
///
/// Returns [`CartError::Empty`] for an empty cart and
/// [`CartError::InvalidQuantity`] for the first line with a quantity below one.
pub fn validate_cart(lines: &[CartLine]) -> Result<(), CartError> {
    if lines.is_empty() {
        return Err(CartError::Empty);
    }
    if let Some(bad) = lines.iter().find(|line| line.quantity < 1) {
        return Err(CartError::InvalidQuantity {
            product_id: bad.product_id,
            quantity: bad.quantity,
        });
    }
    Ok(())
}

/// Take `requested` units out of `available` stock.
///
/// Revenue is only credited for units that are actually sold, so a line that
/// cannot be filled in full rejects the whole order.
///
/// # Errors
///
/// Returns [`CartError::InsufficientStock`] when `requested > available`.
pub const fn reserve_stock(
    product_id: ProductId,
    available: i32,
    requested: i32,
) -> Result<i32, CartError> {
    if requested > available {
        return Err(CartError::InsufficientStock {
            product_id,
            requested,
            available,
        });
    }
    Ok(available - requested)
}

/// Price of a line at the captured unit price.
#[must_use]
pub fn line_total(unit_price: Decimal, quantity: i32) -> Decimal {
    unit_price * Decimal::from(quantity)
}

/// Add a line to a running order total.
///
/// # Errors
///
/// Returns [`CartError::TotalTooLarge`] once the total reaches
/// [`MAX_ORDER_TOTAL`].
pub fn add_line(total: Decimal, unit_price: Decimal, quantity: i32) -> Result<Decimal, CartError> {
    unit_price
        .checked_mul(Decimal::from(quantity))
        .and_then(|amount| total.checked_add(amount))
        .filter(|sum| *sum < MAX_ORDER_TOTAL)
        .ok_or(CartError::TotalTooLarge)
}

/// Loyalty points earned for an order: one point per whole currency unit.
#[must_use]
pub fn points_for_total(total: Decimal) -> i64 {
    total.trunc().to_i64().unwrap_or(0).max(0)
}
