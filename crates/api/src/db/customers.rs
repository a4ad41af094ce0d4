//! Customer loyalty profile repository.

use sqlx::PgPool;

use queens_mall_core::UserId;

use super::RepositoryError;
use crate::models::customer::CustomerProfileView;

/// Repository for customer profiles.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a customer's loyalty profile, creating an empty one if missing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account does not exist.
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_or_create_profile(
        &self,
        user_id: UserId,
    ) -> Result<CustomerProfileView, RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO mall.customer_profile (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO NOTHING
            ",
        )
        .bind(user_id)
        .execute(self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                RepositoryError::NotFound
            }
            other => RepositoryError::Database(other),
        })?;

        sqlx::query_as::<_, CustomerProfileView>(
            r#"
            SELECT u.username, u.email, cp.loyalty_points, cp.tier, cp.joined_at
            FROM mall.customer_profile cp
            JOIN mall."user" u ON u.id = cp.user_id
            WHERE cp.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }
}
