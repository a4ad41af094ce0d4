//! Customer loyalty profile.

use chrono::{DateTime, Utc};
use serde::Serialize;

use queens_mall_core::LoyaltyTier;

/// Loyalty profile joined with the owning account, as shown to the customer.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CustomerProfileView {
    pub username: String,
    pub email: String,
    pub loyalty_points: i64,
    pub tier: LoyaltyTier,
    #[serde(with = "queens_mall_core::time::rfc3339")]
    pub joined_at: DateTime<Utc>,
}
