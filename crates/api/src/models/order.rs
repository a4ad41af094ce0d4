//! Orders as seen by customers and by fulfilling shops.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use queens_mall_core::{OrderId, OrderStatus, UserId};

/// Validated delivery metadata for a new order.
#[derive(Debug, Clone, Default)]
pub struct DeliveryDetails {
    pub address: Option<String>,
    pub contact: Option<String>,
    /// Deadline after which a still-pending order expires.
    pub deadline: Option<DateTime<Utc>>,
}

/// Result of a committed order placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    pub id: OrderId,
    pub total_amount: Decimal,
    /// Lines that matched an existing product.
    pub line_count: usize,
}

/// One order in a customer's history.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CustomerOrder {
    pub id: OrderId,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub status: OrderStatus,
    #[serde(with = "queens_mall_core::time::rfc3339")]
    pub created_at: DateTime<Utc>,
    pub item_count: i64,
    pub delivery_address: Option<String>,
    pub contact_number: Option<String>,
    #[serde(with = "queens_mall_core::time::rfc3339::option")]
    pub delivery_time: Option<DateTime<Utc>>,
}

/// Flat row joining an order with one of a shop's lines in it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FulfillmentLine {
    pub order_id: OrderId,
    pub customer_id: UserId,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub delivery_address: Option<String>,
    pub contact_number: Option<String>,
    pub delivery_time: Option<DateTime<Utc>>,
    pub product_name: String,
    pub quantity: i32,
    pub price_at_purchase: Decimal,
}

/// A line of a fulfillment order, priced at purchase time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FulfillmentItem {
    pub product_name: String,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// An order containing at least one of a shop's products, restricted to
/// that shop's lines.
#[derive(Debug, Clone, Serialize)]
pub struct FulfillmentOrder {
    pub id: OrderId,
    pub customer_id: UserId,
    #[serde(with = "queens_mall_core::time::rfc3339")]
    pub date: DateTime<Utc>,
    pub status: OrderStatus,
    pub delivery_address: Option<String>,
    pub contact_number: Option<String>,
    #[serde(with = "queens_mall_core::time::rfc3339::option")]
    pub delivery_time: Option<DateTime<Utc>>,
    pub items: Vec<FulfillmentItem>,
    /// Sum of this shop's line totals only.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
}
