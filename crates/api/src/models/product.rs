//! Shop catalogue.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use queens_mall_core::limits::{self, TooLong};
use queens_mall_core::{ProductId, TenantId};

/// A product listed by a shop.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub tenant_id: TenantId,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i32,
    pub image_url: Option<String>,
    #[serde(with = "queens_mall_core::time::rfc3339")]
    pub created_at: DateTime<Utc>,
}

/// A product to add to a shop.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    #[serde(default)]
    pub stock: i32,
    pub image_url: Option<String>,
}

impl NewProduct {
    /// Reject text fields longer than their columns.
    ///
    /// # Errors
    ///
    /// Returns the first field that is too long.
    pub fn check_lengths(&self) -> Result<(), TooLong> {
        limits::check_len("name", self.name.trim(), limits::PRODUCT_NAME)?;
        limits::check_opt_len("image_url", self.image_url.as_deref().map(str::trim), limits::IMAGE_URL)
    }
}

/// Partial product update. Absent fields are unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub image_url: Option<String>,
}

impl ProductUpdate {
    /// Reject text fields longer than their columns.
    ///
    /// # Errors
    ///
    /// Returns the first field that is too long.
    pub fn check_lengths(&self) -> Result<(), TooLong> {
        limits::check_opt_len("name", self.name.as_deref().map(str::trim), limits::PRODUCT_NAME)?;
        limits::check_opt_len("image_url", self.image_url.as_deref().map(str::trim), limits::IMAGE_URL)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_name_limit() {
        let draft = NewProduct {
            name: "n".repeat(100),
            description: None,
            price: None,
            stock: 0,
            image_url: None,
        };
        assert!(draft.check_lengths().is_ok());

        let draft = NewProduct {
            name: "n".repeat(101),
            ..draft
        };
        assert_eq!(draft.check_lengths().unwrap_err().field, "name");
    }

    #[test]
    fn test_update_checks_image_url() {
        let update = ProductUpdate {
            image_url: Some(format!("https://cdn.example.com/{}", "a".repeat(500))),
            ..ProductUpdate::default()
        };
        assert_eq!(update.check_lengths().unwrap_err().field, "image_url");
        assert!(ProductUpdate::default().check_lengths().is_ok());
    }
}
