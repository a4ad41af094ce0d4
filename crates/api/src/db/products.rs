//! Product repository.
//!
//! Tenant-facing methods always filter by the owning shop, so a product that
//! belongs to another shop looks exactly like a missing one.

use rust_decimal::Decimal;
use sqlx::PgPool;

use queens_mall_core::{ProductId, TenantId};

use super::RepositoryError;
use crate::models::product::{Product, ProductUpdate};

const PRODUCT_COLUMNS: &str =
    "p.id, p.tenant_id, p.name, p.description, p.price, p.stock, p.image_url, p.created_at";

/// Fields of a validated new product.
#[derive(Debug, Clone)]
pub struct ProductDraft<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price: Decimal,
    pub stock: i32,
    pub image_url: Option<&'a str>,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get any product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM mall.product p WHERE p.id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(product)
    }

    /// List a shop's products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_tenant(&self, tenant_id: TenantId) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM mall.product p \
             WHERE p.tenant_id = $1 ORDER BY p.created_at DESC, p.id DESC"
        ))
        .bind(tenant_id)
        .fetch_all(self.pool)
        .await?;
        Ok(products)
    }

    /// List the products of a shop only if that shop is approved.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_approved_shop(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM mall.product p \
             JOIN mall.tenant t ON t.id = p.tenant_id \
             WHERE p.tenant_id = $1 AND t.is_approved \
             ORDER BY p.created_at DESC, p.id DESC"
        ))
        .bind(tenant_id)
        .fetch_all(self.pool)
        .await?;
        Ok(products)
    }

    /// Get one of a shop's products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_tenant(
        &self,
        tenant_id: TenantId,
        id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM mall.product p WHERE p.id = $1 AND p.tenant_id = $2"
        ))
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(product)
    }

    /// Count a shop's products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_for_tenant(&self, tenant_id: TenantId) -> Result<i64, RepositoryError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM mall.product WHERE tenant_id = $1")
                .bind(tenant_id)
                .fetch_one(self.pool)
                .await?;
        Ok(count)
    }

    /// Add a product to a shop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        tenant_id: TenantId,
        draft: &ProductDraft<'_>,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            INSERT INTO mall.product AS p (tenant_id, name, description, price, stock, image_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING p.id, p.tenant_id, p.name, p.description, p.price, p.stock,
                      p.image_url, p.created_at
            ",
        )
        .bind(tenant_id)
        .bind(draft.name)
        .bind(draft.description)
        .bind(draft.price)
        .bind(draft.stock)
        .bind(draft.image_url)
        .fetch_one(self.pool)
        .await?;
        Ok(product)
    }

    /// Apply a partial update to one of a shop's products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        tenant_id: TenantId,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            UPDATE mall.product AS p
            SET name        = COALESCE($3, p.name),
                description = COALESCE($4, p.description),
                price       = COALESCE($5, p.price),
                stock       = COALESCE($6, p.stock),
                image_url   = COALESCE($7, p.image_url)
            WHERE p.id = $1 AND p.tenant_id = $2
            RETURNING p.id, p.tenant_id, p.name, p.description, p.price, p.stock,
                      p.image_url, p.created_at
            ",
        )
        .bind(id)
        .bind(tenant_id)
        .bind(update.name.as_deref().map(str::trim))
        .bind(update.description.as_deref())
        .bind(update.price)
        .bind(update.stock)
        .bind(update.image_url.as_deref())
        .fetch_optional(self.pool)
        .await?;
        Ok(product)
    }

    /// Remove one of a shop's products. Returns `false` if nothing matched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InUse` if the product appears in any order.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, tenant_id: TenantId, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM mall.product WHERE id = $1 AND tenant_id = $2")
            .bind(id)
            .bind(tenant_id)
            .execute(self.pool)
            .await
            .map_err(|e| {
                RepositoryError::referenced(e, "Product has order history and cannot be deleted")
            })?;
        Ok(result.rows_affected() > 0)
    }
}
