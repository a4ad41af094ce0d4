//! Order workflows shared by the customer and tenant handlers.
//!
//! Every listing first expires overdue pending orders in the caller's scope
//! so the returned statuses are current.

use sqlx::PgPool;
use thiserror::Error;

use queens_mall_core::limits::{self, TooLong};
use queens_mall_core::order::{CartError, CartLine, line_total};
use queens_mall_core::time::{TimestampError, parse_timestamp};
use queens_mall_core::{OrderId, OrderStatus, TenantId, UserId};

use crate::db::RepositoryError;
use crate::db::orders::{OrderRepository, PlaceOrderError};
use crate::models::order::{
    CustomerOrder, DeliveryDetails, FulfillmentItem, FulfillmentLine, FulfillmentOrder,
    PlacedOrder,
};

/// Errors from order workflows.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("{0}")]
    Cart(#[from] CartError),

    #[error("Invalid delivery_time: {0}")]
    InvalidDeliveryTime(#[from] TimestampError),

    #[error(transparent)]
    TooLong(#[from] TooLong),

    /// Order missing or not visible to the caller.
    #[error("Order not found")]
    NotFound,

    #[error("Invalid status")]
    InvalidStatus,

    /// Order already left `Pending`.
    #[error("Order is already {0}")]
    AlreadyFinal(OrderStatus),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<PlaceOrderError> for OrderError {
    fn from(err: PlaceOrderError) -> Self {
        match err {
            PlaceOrderError::Cart(e) => Self::Cart(e),
            PlaceOrderError::Repository(e) => Self::Repository(e),
        }
    }
}

/// Raw delivery fields of a new order.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeliveryRequest<'r> {
    pub address: Option<&'r str>,
    pub contact: Option<&'r str>,
    /// ISO-8601 deadline; blank means none.
    pub delivery_time: Option<&'r str>,
}

impl DeliveryRequest<'_> {
    /// Validate into [`DeliveryDetails`].
    ///
    /// # Errors
    ///
    /// Returns `OrderError::InvalidDeliveryTime` for an unparseable deadline
    /// and `OrderError::TooLong` for an address or contact too long to store.
    pub fn validate(&self) -> Result<DeliveryDetails, OrderError> {
        let address = non_blank(self.address);
        let contact = non_blank(self.contact);
        limits::check_opt_len("address", address.as_deref(), limits::DELIVERY_ADDRESS)?;
        limits::check_opt_len("contact", contact.as_deref(), limits::CONTACT_NUMBER)?;

        let deadline = self
            .delivery_time
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(parse_timestamp)
            .transpose()?;

        Ok(DeliveryDetails {
            address,
            contact,
            deadline,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Order service.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
}

impl<'a> OrderService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
        }
    }

    /// Place an order for a customer.
    ///
    /// All input is validated before the database is touched.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Cart` for an empty cart, a bad quantity or
    /// insufficient stock, and `OrderError::InvalidDeliveryTime` for a bad
    /// deadline.
    pub async fn place(
        &self,
        user_id: UserId,
        lines: &[CartLine],
        delivery: DeliveryRequest<'_>,
    ) -> Result<PlacedOrder, OrderError> {
        queens_mall_core::order::validate_cart(lines)?;
        let details = delivery.validate()?;

        Ok(self.orders.place(user_id, lines, &details).await?)
    }

    /// A customer's order history with overdue orders expired.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if a query fails.
    pub async fn history(&self, user_id: UserId) -> Result<Vec<CustomerOrder>, OrderError> {
        let expired = self.orders.expire_overdue_for_customer(user_id).await?;
        if expired > 0 {
            tracing::info!(user_id = %user_id, expired, "Expired overdue orders");
        }
        Ok(self.orders.list_for_customer(user_id).await?)
    }

    /// Orders containing a shop's products, scoped to that shop's lines.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if a query fails.
    pub async fn fulfillment(&self, tenant_id: TenantId) -> Result<Vec<FulfillmentOrder>, OrderError> {
        let expired = self.orders.expire_overdue_for_tenant(tenant_id).await?;
        if expired > 0 {
            tracing::info!(tenant_id = %tenant_id, expired, "Expired overdue orders");
        }
        let lines = self.orders.fulfillment_lines(tenant_id).await?;
        Ok(group_fulfillment(lines))
    }

    /// Complete or cancel a pending order containing one of the shop's
    /// products.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::InvalidStatus` unless `requested` is `Completed`
    /// or `Cancelled`, `OrderError::NotFound` if the order has none of the
    /// shop's products, and `OrderError::AlreadyFinal` if it is no longer
    /// pending.
    pub async fn set_status(
        &self,
        tenant_id: TenantId,
        order_id: OrderId,
        requested: &str,
    ) -> Result<OrderStatus, OrderError> {
        let next: OrderStatus = requested.parse().map_err(|_| OrderError::InvalidStatus)?;
        if !next.is_tenant_settable() {
            return Err(OrderError::InvalidStatus);
        }

        self.orders.expire_overdue_for_tenant(tenant_id).await?;

        let current = self
            .orders
            .status_for_tenant(tenant_id, order_id)
            .await?
            .ok_or(OrderError::NotFound)?;

        if !current.can_transition_to(next) {
            return Err(OrderError::AlreadyFinal(current));
        }

        if !self.orders.transition_status(order_id, next).await? {
            let now = self
                .orders
                .status_for_tenant(tenant_id, order_id)
                .await?
                .ok_or(OrderError::NotFound)?;
            return Err(OrderError::AlreadyFinal(now));
        }

        tracing::info!(order_id = %order_id, tenant_id = %tenant_id, status = %next, "Order status updated");

        Ok(next)
    }
}

/// Group a shop's order lines into one entry per order, keeping the input
/// order of first appearance.
#[must_use]
pub fn group_fulfillment(lines: Vec<FulfillmentLine>) -> Vec<FulfillmentOrder> {
    let mut grouped: Vec<FulfillmentOrder> = Vec::new();

    for line in lines {
        let item = FulfillmentItem {
            total: line_total(line.price_at_purchase, line.quantity),
            product_name: line.product_name,
            quantity: line.quantity,
            price: line.price_at_purchase,
        };

        match grouped.iter_mut().find(|order| order.id == line.order_id) {
            Some(order) => {
                order.total_revenue += item.total;
                order.items.push(item);
            }
            None => grouped.push(FulfillmentOrder {
                id: line.order_id,
                customer_id: line.customer_id,
                date: line.created_at,
                status: line.status,
                delivery_address: line.delivery_address,
                contact_number: line.contact_number,
                delivery_time: line.delivery_time,
                total_revenue: item.total,
                items: vec![item],
            }),
        }
    }

    grouped
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::*;

    fn line(order: i32, product: &str, quantity: i32, price: Decimal) -> FulfillmentLine {
        FulfillmentLine {
            order_id: OrderId::new(order),
            customer_id: UserId::new(7),
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            status: OrderStatus::Pending,
            delivery_address: Some("12 Market St".to_owned()),
            contact_number: None,
            delivery_time: None,
            product_name: product.to_owned(),
            quantity,
            price_at_purchase: price,
        }
    }

    #[test]
    fn test_groups_lines_by_order() {
        let grouped = group_fulfillment(vec![
            line(9, "Lamp", 2, Decimal::new(1000, 2)),
            line(9, "Rug", 1, Decimal::new(4550, 2)),
            line(4, "Lamp", 1, Decimal::new(1000, 2)),
        ]);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].id, OrderId::new(9));
        assert_eq!(grouped[0].items.len(), 2);
        assert_eq!(grouped[0].total_revenue, Decimal::new(6550, 2));
        assert_eq!(grouped[1].id, OrderId::new(4));
        assert_eq!(grouped[1].total_revenue, Decimal::new(1000, 2));
    }

    #[test]
    fn test_item_total_uses_captured_price() {
        let grouped = group_fulfillment(vec![line(1, "Mug", 3, Decimal::new(333, 2))]);
        let item = &grouped[0].items[0];

        assert_eq!(item.price, Decimal::new(333, 2));
        assert_eq!(item.total, Decimal::new(999, 2));
    }

    #[test]
    fn test_no_lines_no_orders() {
        assert!(group_fulfillment(Vec::new()).is_empty());
    }

    #[test]
    fn test_blank_delivery_time_means_none() {
        let details = DeliveryRequest {
            address: Some("  "),
            contact: Some("555-0100"),
            delivery_time: Some(""),
        }
        .validate()
        .unwrap();

        assert_eq!(details.address, None);
        assert_eq!(details.contact.as_deref(), Some("555-0100"));
        assert_eq!(details.deadline, None);
    }

    #[test]
    fn test_zulu_delivery_time_parsed() {
        let details = DeliveryRequest {
            delivery_time: Some("2026-05-01T18:30:00Z"),
            ..DeliveryRequest::default()
        }
        .validate()
        .unwrap();

        assert_eq!(
            details.deadline,
            Some(Utc.with_ymd_and_hms(2026, 5, 1, 18, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_oversized_address_rejected() {
        let address = "9".repeat(300);
        let result = DeliveryRequest {
            address: Some(&address),
            ..DeliveryRequest::default()
        }
        .validate();

        assert!(matches!(
            result,
            Err(OrderError::TooLong(TooLong { field: "address", max: 255 }))
        ));
    }

    #[test]
    fn test_oversized_contact_rejected() {
        let contact = "5".repeat(101);
        let result = DeliveryRequest {
            contact: Some(&contact),
            ..DeliveryRequest::default()
        }
        .validate();

        assert!(matches!(result, Err(OrderError::TooLong(_))));
    }

    #[test]
    fn test_malformed_delivery_time_rejected() {
        let result = DeliveryRequest {
            delivery_time: Some("next tuesday"),
            ..DeliveryRequest::default()
        }
        .validate();

        assert!(matches!(result, Err(OrderError::InvalidDeliveryTime(_))));
    }
}
