//! Shops.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use queens_mall_core::limits::{self, TooLong};
use queens_mall_core::{TenantId, UserId};

/// A shop owned by a tenant account.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Tenant {
    pub id: TenantId,
    #[serde(skip_serializing)]
    pub user_id: UserId,
    pub shop_name: String,
    pub category: Option<String>,
    pub shop_number: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    /// Cumulative revenue credited from sales. Never decremented.
    #[serde(with = "rust_decimal::serde::float")]
    pub account_balance: Decimal,
    pub is_approved: bool,
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
}

/// Partial update of a shop's public profile. Absent fields are unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TenantProfileUpdate {
    pub shop_name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub shop_number: Option<String>,
}

impl TenantProfileUpdate {
    /// Reject text fields longer than their columns.
    ///
    /// # Errors
    ///
    /// Returns the first field that is too long.
    pub fn check_lengths(&self) -> Result<(), TooLong> {
        let fields = [
            ("shop_name", &self.shop_name, limits::SHOP_NAME),
            ("category", &self.category, limits::CATEGORY),
            ("shop_number", &self.shop_number, limits::SHOP_NUMBER),
            ("image_url", &self.image_url, limits::IMAGE_URL),
        ];
        for (field, value, max) in fields {
            limits::check_opt_len(field, value.as_deref().map(str::trim), max)?;
        }
        Ok(())
    }
}

/// Revenue of one shop on the admin dashboard.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ShopRevenue {
    pub shop_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
    pub category: Option<String>,
}
