//! Shop repository.

use rust_decimal::Decimal;
use sqlx::PgPool;

use queens_mall_core::{TenantId, UserId};

use super::RepositoryError;
use crate::models::tenant::{ShopRevenue, Tenant, TenantProfileUpdate};

const TENANT_COLUMNS: &str = "id, user_id, shop_name, category, shop_number, image_url, \
     description, account_balance, is_approved, created_at";

/// Repository for shop database operations.
pub struct TenantRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TenantRepository<'a> {
    /// Create a new tenant repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the shop owned by an account, creating a default unapproved one if
    /// the account has none yet.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account does not exist.
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_or_create_for_user(&self, user_id: UserId) -> Result<Tenant, RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO mall.tenant (user_id, shop_name, category)
            SELECT u.id, u.username || '''s Shop', 'General'
            FROM mall."user" u
            WHERE u.id = $1
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .execute(self.pool)
        .await?;

        self.get_by_user(user_id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Get the shop owned by an account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_user(&self, user_id: UserId) -> Result<Option<Tenant>, RepositoryError> {
        let tenant = sqlx::query_as::<_, Tenant>(&format!(
            "SELECT {TENANT_COLUMNS} FROM mall.tenant WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(tenant)
    }

    /// List every shop, approved or not.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Tenant>, RepositoryError> {
        let tenants = sqlx::query_as::<_, Tenant>(&format!(
            "SELECT {TENANT_COLUMNS} FROM mall.tenant ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(tenants)
    }

    /// List shops visible to shoppers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_approved(&self) -> Result<Vec<Tenant>, RepositoryError> {
        let tenants = sqlx::query_as::<_, Tenant>(&format!(
            "SELECT {TENANT_COLUMNS} FROM mall.tenant WHERE is_approved ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(tenants)
    }

    /// Get an approved shop by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_approved(&self, id: TenantId) -> Result<Option<Tenant>, RepositoryError> {
        let tenant = sqlx::query_as::<_, Tenant>(&format!(
            "SELECT {TENANT_COLUMNS} FROM mall.tenant WHERE id = $1 AND is_approved"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(tenant)
    }

    /// Apply a partial profile update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the shop does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_profile(
        &self,
        id: TenantId,
        update: &TenantProfileUpdate,
    ) -> Result<Tenant, RepositoryError> {
        sqlx::query_as::<_, Tenant>(&format!(
            r"
            UPDATE mall.tenant
            SET shop_name   = COALESCE($2, shop_name),
                description = COALESCE($3, description),
                image_url   = COALESCE($4, image_url),
                category    = COALESCE($5, category),
                shop_number = COALESCE($6, shop_number)
            WHERE id = $1
            RETURNING {TENANT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(update.shop_name.as_deref())
        .bind(update.description.as_deref())
        .bind(update.image_url.as_deref())
        .bind(update.category.as_deref())
        .bind(update.shop_number.as_deref())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Flip a shop's approval flag, returning the new value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn toggle_approval(&self, id: TenantId) -> Result<Option<bool>, RepositoryError> {
        let approved = sqlx::query_scalar::<_, bool>(
            r"
            UPDATE mall.tenant
            SET is_approved = NOT is_approved
            WHERE id = $1
            RETURNING is_approved
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(approved)
    }

    /// Revenue per shop, highest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn revenue_by_shop(&self) -> Result<Vec<ShopRevenue>, RepositoryError> {
        let rows = sqlx::query_as::<_, ShopRevenue>(
            r"
            SELECT shop_name, account_balance AS revenue, category
            FROM mall.tenant
            ORDER BY account_balance DESC, id
            ",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Sum of every shop's balance.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn total_revenue(&self) -> Result<Decimal, RepositoryError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(account_balance), 0) FROM mall.tenant",
        )
        .fetch_one(self.pool)
        .await?;
        Ok(total)
    }

    /// Shop counts grouped by raw category (possibly `NULL`).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn category_counts(&self) -> Result<Vec<(Option<String>, i64)>, RepositoryError> {
        let rows = sqlx::query_as::<_, (Option<String>, i64)>(
            r"
            SELECT category, COUNT(*)
            FROM mall.tenant
            GROUP BY category
            ORDER BY COUNT(*) DESC, category
            ",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }
}
