//! Account models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use queens_mall_core::{Email, Role, UserId, Username};

/// A registered account.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(with = "queens_mall_core::time::rfc3339")]
    pub created_at: DateTime<Utc>,
}

/// Validated registration data, ready to be stored.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub email: Email,
    /// Argon2 PHC string
    pub password_hash: String,
    pub role: Role,
    /// Shop details used when `role` is [`Role::Tenant`]
    pub shop_name: Option<String>,
    pub category: Option<String>,
}
