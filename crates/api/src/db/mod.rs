//! Database operations for the marketplace `PostgreSQL` schema.
//!
//! # Schema: `mall`
//!
//! ## Tables
//!
//! - `user` - Accounts (username, email, Argon2 hash, role)
//! - `tenant` - Shops, one per tenant account, with running revenue balance
//! - `customer_profile` - Loyalty points and tier, one per customer account
//! - `product` - Shop catalogue with stock counts
//! - `order` / `order_item` - Placed orders and price-snapshotted lines
//! - `event` - Mall-wide or shop events
//! - `wishlist` - Saved products per account
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p queens-mall-cli -- migrate
//! ```
//!
//! Queries use the runtime-checked `sqlx::query_as` API with `FromRow` row
//! types, so the crate builds without a live database.

pub mod customers;
pub mod events;
pub mod orders;
pub mod products;
pub mod tenants;
pub mod users;
pub mod wishlist;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use customers::CustomerRepository;
pub use events::EventRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use tenants::TenantRepository;
pub use users::UserRepository;
pub use wishlist::WishlistRepository;

/// Embedded migrations from `crates/api/migrations`.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Unique constraint violation (e.g., duplicate username).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Row is still referenced by other rows and cannot be removed.
    #[error("still in use: {0}")]
    InUse(String),
}

impl RepositoryError {
    /// Map unique violations to [`RepositoryError::Conflict`] with `message`.
    pub(crate) fn unique(err: sqlx::Error, message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::Conflict(message.to_owned());
        }
        Self::Database(err)
    }

    /// Map foreign key violations to [`RepositoryError::InUse`] with `message`.
    pub(crate) fn referenced(err: sqlx::Error, message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_foreign_key_violation()
        {
            return Self::InUse(message.to_owned());
        }
        Self::Database(err)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
