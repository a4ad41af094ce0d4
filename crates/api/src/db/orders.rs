//! Order repository: placement, expiry, fulfillment and reporting queries.
//!
//! # Placement
//!
//! [`OrderRepository::place`] runs the whole settlement in one transaction:
//!
//! 1. Lock every product in the cart with one `SELECT ... ORDER BY id FOR
//!    UPDATE`.
//! 2. Settle the cart in memory: check stock, snapshot unit prices, total the
//!    order and sum the credit owed to each shop.
//! 3. Insert the order and its `order_item` rows.
//! 4. Decrement stock, then credit shop balances in ascending shop ID.
//! 5. Add loyalty points and recompute the tier.
//!
//! Every placement takes product locks before shop locks, each in ascending
//! ID order, so concurrent carts cannot deadlock whatever order their lines
//! arrive in.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;
use tracing::instrument;

use queens_mall_core::order::{self, CartError, CartLine};
use queens_mall_core::{LoyaltyTier, OrderId, OrderStatus, ProductId, TenantId, UserId};

use super::RepositoryError;
use crate::models::order::{CustomerOrder, DeliveryDetails, FulfillmentLine, PlacedOrder};

/// Errors from order placement.
#[derive(Debug, Error)]
pub enum PlaceOrderError {
    /// The cart cannot be settled as requested.
    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for PlaceOrderError {
    fn from(err: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(err))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LockedProduct {
    id: ProductId,
    tenant_id: TenantId,
    price: Decimal,
    stock: i32,
}

/// A cart settled against locked product rows, before anything is written.
#[derive(Debug, Default, PartialEq, Eq)]
struct Settlement {
    /// (product, quantity, unit price) per accepted cart line
    items: Vec<(ProductId, i32, Decimal)>,
    /// Units sold per product
    sold: BTreeMap<ProductId, i32>,
    /// Revenue owed per shop
    credits: BTreeMap<TenantId, Decimal>,
    total: Decimal,
}

/// Settle `lines` against `products`. Unknown products are skipped; repeated
/// lines for one product draw on the same stock.
fn settle(lines: &[CartLine], products: &[LockedProduct]) -> Result<Settlement, CartError> {
    let by_id: BTreeMap<ProductId, &LockedProduct> =
        products.iter().map(|p| (p.id, p)).collect();
    let mut remaining: BTreeMap<ProductId, i32> =
        products.iter().map(|p| (p.id, p.stock)).collect();
    let mut settlement = Settlement::default();

    for line in lines {
        let (Some(product), Some(stock)) =
            (by_id.get(&line.product_id), remaining.get_mut(&line.product_id))
        else {
            tracing::debug!(product_id = %line.product_id, "Skipping unknown product");
            continue;
        };

        *stock = order::reserve_stock(line.product_id, *stock, line.quantity)?;
        let total = order::add_line(settlement.total, product.price, line.quantity)?;
        let amount = total - settlement.total;
        settlement.total = total;

        settlement
            .items
            .push((line.product_id, line.quantity, product.price));
        *settlement.sold.entry(line.product_id).or_default() += line.quantity;
        *settlement.credits.entry(product.tenant_id).or_default() += amount;
    }

    Ok(settlement)
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Materialize a cart into an order.
    ///
    /// Unknown product IDs are skipped. Nothing is visible to other
    /// transactions unless every line settles.
    ///
    /// # Errors
    ///
    /// Returns `PlaceOrderError::Cart` for an empty cart, a bad quantity, a
    /// line exceeding stock or a total out of range; the transaction is
    /// rolled back.
    /// Returns `PlaceOrderError::Repository` if a query fails.
    #[instrument(skip(self, lines, delivery), fields(user_id = %user_id, lines = lines.len()))]
    pub async fn place(
        &self,
        user_id: UserId,
        lines: &[CartLine],
        delivery: &DeliveryDetails,
    ) -> Result<PlacedOrder, PlaceOrderError> {
        order::validate_cart(lines)?;

        let product_ids: Vec<i32> = lines
            .iter()
            .map(|line| line.product_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|id| id.as_i32())
            .collect();

        let mut tx = self.pool.begin().await?;

        let products = sqlx::query_as::<_, LockedProduct>(
            r"
            SELECT id, tenant_id, price, stock
            FROM mall.product
            WHERE id = ANY($1)
            ORDER BY id
            FOR UPDATE
            ",
        )
        .bind(product_ids)
        .fetch_all(&mut *tx)
        .await?;

        let settlement = settle(lines, &products)?;
        let total = settlement.total;
        let line_count = settlement.items.len();

        let order_id = sqlx::query_scalar::<_, OrderId>(
            r#"
            INSERT INTO mall."order" (user_id, total_amount, status, delivery_address,
                                      contact_number, delivery_time)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(total)
        .bind(OrderStatus::Pending)
        .bind(delivery.address.as_deref())
        .bind(delivery.contact.as_deref())
        .bind(delivery.deadline)
        .fetch_one(&mut *tx)
        .await?;

        for (product_id, quantity, price) in &settlement.items {
            sqlx::query(
                r"
                INSERT INTO mall.order_item (order_id, product_id, quantity, price_at_purchase)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(order_id)
            .bind(product_id)
            .bind(quantity)
            .bind(price)
            .execute(&mut *tx)
            .await?;
        }

        for (product_id, quantity) in &settlement.sold {
            sqlx::query("UPDATE mall.product SET stock = stock - $2 WHERE id = $1")
                .bind(product_id)
                .bind(quantity)
                .execute(&mut *tx)
                .await?;
        }

        // BTreeMap iteration keeps shop locks in ascending ID order
        for (tenant_id, amount) in &settlement.credits {
            sqlx::query(
                "UPDATE mall.tenant SET account_balance = account_balance + $2 WHERE id = $1",
            )
            .bind(tenant_id)
            .bind(amount)
            .execute(&mut *tx)
            .await?;
        }

        let points = sqlx::query_scalar::<_, i64>(
            r"
            UPDATE mall.customer_profile
            SET loyalty_points = loyalty_points + $2
            WHERE user_id = $1
            RETURNING loyalty_points
            ",
        )
        .bind(user_id)
        .bind(order::points_for_total(total))
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(points) = points {
            sqlx::query("UPDATE mall.customer_profile SET tier = $2 WHERE user_id = $1")
                .bind(user_id)
                .bind(LoyaltyTier::for_points(points))
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(order_id = %order_id, total = %total, line_count, "Order placed");

        Ok(PlacedOrder {
            id: order_id,
            total_amount: total,
            line_count,
        })
    }

    /// Expire a customer's overdue pending orders. Returns the number expired.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn expire_overdue_for_customer(&self, user_id: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE mall."order"
            SET status = $2
            WHERE user_id = $1
              AND status = $3
              AND delivery_time IS NOT NULL
              AND delivery_time < $4
            "#,
        )
        .bind(user_id)
        .bind(OrderStatus::Expired)
        .bind(OrderStatus::Pending)
        .bind(Utc::now())
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Expire overdue pending orders containing any of a shop's products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn expire_overdue_for_tenant(
        &self,
        tenant_id: TenantId,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE mall."order" o
            SET status = $2
            WHERE o.status = $3
              AND o.delivery_time IS NOT NULL
              AND o.delivery_time < $4
              AND EXISTS (
                  SELECT 1
                  FROM mall.order_item oi
                  JOIN mall.product p ON p.id = oi.product_id
                  WHERE oi.order_id = o.id AND p.tenant_id = $1
              )
            "#,
        )
        .bind(tenant_id)
        .bind(OrderStatus::Expired)
        .bind(OrderStatus::Pending)
        .bind(Utc::now())
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Expire every overdue pending order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn expire_overdue(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE mall."order"
            SET status = $1
            WHERE status = $2
              AND delivery_time IS NOT NULL
              AND delivery_time < $3
            "#,
        )
        .bind(OrderStatus::Expired)
        .bind(OrderStatus::Pending)
        .bind(Utc::now())
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// A customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_customer(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CustomerOrder>, RepositoryError> {
        let orders = sqlx::query_as::<_, CustomerOrder>(
            r#"
            SELECT o.id, o.total_amount, o.status, o.created_at,
                   COUNT(oi.id) AS item_count,
                   o.delivery_address, o.contact_number, o.delivery_time
            FROM mall."order" o
            LEFT JOIN mall.order_item oi ON oi.order_id = o.id
            WHERE o.user_id = $1
            GROUP BY o.id
            ORDER BY o.created_at DESC, o.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        Ok(orders)
    }

    /// Every line of a shop's products in any order, newest order first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn fulfillment_lines(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<FulfillmentLine>, RepositoryError> {
        let lines = sqlx::query_as::<_, FulfillmentLine>(
            r#"
            SELECT o.id AS order_id, o.user_id AS customer_id, o.created_at, o.status,
                   o.delivery_address, o.contact_number, o.delivery_time,
                   p.name AS product_name, oi.quantity, oi.price_at_purchase
            FROM mall.order_item oi
            JOIN mall.product p ON p.id = oi.product_id
            JOIN mall."order" o ON o.id = oi.order_id
            WHERE p.tenant_id = $1
            ORDER BY o.created_at DESC, o.id DESC, oi.id
            "#,
        )
        .bind(tenant_id)
        .fetch_all(self.pool)
        .await?;
        Ok(lines)
    }

    /// Status of an order, only if it contains one of the shop's products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn status_for_tenant(
        &self,
        tenant_id: TenantId,
        order_id: OrderId,
    ) -> Result<Option<OrderStatus>, RepositoryError> {
        let status = sqlx::query_scalar::<_, OrderStatus>(
            r#"
            SELECT o.status
            FROM mall."order" o
            WHERE o.id = $1
              AND EXISTS (
                  SELECT 1
                  FROM mall.order_item oi
                  JOIN mall.product p ON p.id = oi.product_id
                  WHERE oi.order_id = o.id AND p.tenant_id = $2
              )
            "#,
        )
        .bind(order_id)
        .bind(tenant_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(status)
    }

    /// Move a pending order to `status`. Returns `false` if the order was no
    /// longer pending.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn transition_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE mall."order" SET status = $2 WHERE id = $1 AND status = $3"#,
        )
        .bind(order_id)
        .bind(status)
        .bind(OrderStatus::Pending)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Order totals summed per calendar month (1-12) across all years.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn revenue_by_month(&self) -> Result<Vec<(i32, Decimal)>, RepositoryError> {
        let rows = sqlx::query_as::<_, (i32, Decimal)>(
            r#"
            SELECT EXTRACT(MONTH FROM created_at AT TIME ZONE 'UTC')::INT AS month,
                   COALESCE(SUM(total_amount), 0) AS revenue
            FROM mall."order"
            GROUP BY 1
            "#,
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Order counts per ISO weekday (1 = Monday .. 7 = Sunday).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_by_weekday(&self) -> Result<Vec<(i32, i64)>, RepositoryError> {
        let rows = sqlx::query_as::<_, (i32, i64)>(
            r#"
            SELECT EXTRACT(ISODOW FROM created_at AT TIME ZONE 'UTC')::INT AS weekday,
                   COUNT(*) AS orders
            FROM mall."order"
            GROUP BY 1
            "#,
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }
}
