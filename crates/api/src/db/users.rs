//! User repository for database operations.
//!
//! Registration creates the account together with its role-specific profile
//! (shop or loyalty profile) in a single transaction.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use queens_mall_core::reports::DEFAULT_CATEGORY;
use queens_mall_core::{Role, UserId};

use super::RepositoryError;
use crate::models::user::{NewUser, User};

const USER_EXISTS: &str = "User already exists";

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: UserId,
    username: String,
    email: String,
    role: Role,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            role: row.role,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserWithHashRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, role, created_at
            FROM mall."user"
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Get a user and their stored password hash by username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithHashRow>(
            r#"
            SELECT id, username, email, role, created_at, password_hash
            FROM mall."user"
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| (r.user.into(), r.password_hash)))
    }

    /// Create an account and its role profile.
    ///
    /// - `tenant` accounts get an unapproved shop, named `"{username}'s Shop"`
    ///   in category `General` unless given.
    /// - `customer` accounts get a loyalty profile with 0 points (Bronze).
    /// - `admin` accounts get no profile.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username or email is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new_user: &NewUser) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let user: User = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO mall."user" (username, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, role, created_at
            "#,
        )
        .bind(new_user.username.as_str())
        .bind(new_user.email.as_str())
        .bind(&new_user.password_hash)
        .bind(new_user.role)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::unique(e, USER_EXISTS))?
        .into();

        match new_user.role {
            Role::Tenant => {
                let shop_name = new_user
                    .shop_name
                    .as_deref()
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map_or_else(|| new_user.username.default_shop_name(), str::to_owned);
                let category = new_user
                    .category
                    .as_deref()
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .unwrap_or(DEFAULT_CATEGORY);

                sqlx::query(
                    r"
                    INSERT INTO mall.tenant (user_id, shop_name, category, is_approved)
                    VALUES ($1, $2, $3, FALSE)
                    ",
                )
                .bind(user.id)
                .bind(shop_name)
                .bind(category)
                .execute(&mut *tx)
                .await?;
            }
            Role::Customer => {
                sqlx::query("INSERT INTO mall.customer_profile (user_id) VALUES ($1)")
                    .bind(user.id)
                    .execute(&mut *tx)
                    .await?;
            }
            Role::Admin => {}
        }

        tx.commit().await?;

        Ok(user)
    }

    /// Whether a username or email is already registered.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, username: &str, email: &str) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS (SELECT 1 FROM mall."user" WHERE username = $1 OR email = $2)"#,
        )
        .bind(username)
        .bind(email)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// Count all accounts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_all(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM mall."user""#)
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Count accounts with a given role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_by_role(&self, role: Role) -> Result<i64, RepositoryError> {
        let count =
            sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM mall."user" WHERE role = $1"#)
                .bind(role)
                .fetch_one(self.pool)
                .await?;
        Ok(count)
    }
}
