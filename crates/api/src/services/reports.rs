//! Dashboard aggregates.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use queens_mall_core::Role;
use queens_mall_core::reports::{
    self, CategoryShare, DailyTraffic, MonthlyRevenue, OCCUPANCY_RATE,
};

use crate::db::{OrderRepository, ProductRepository, RepositoryError, TenantRepository, UserRepository};
use crate::models::tenant::{ShopRevenue, Tenant};

/// Admin dashboard headline figures.
#[derive(Debug, Clone, Serialize)]
pub struct AdminStats {
    pub total_users: i64,
    pub total_tenants: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    pub shop_revenue: Vec<ShopRevenue>,
    pub occupancy_rate: u8,
    pub monthly_revenue: Vec<MonthlyRevenue>,
}

/// Admin analytics charts.
#[derive(Debug, Clone, Serialize)]
pub struct MallAnalytics {
    pub category_data: Vec<CategoryShare>,
    pub traffic_data: Vec<DailyTraffic>,
}

/// A shop's own dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct ShopStats {
    pub shop_name: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub total_products: i64,
    /// Revenue credited to the shop so far.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_sales: Decimal,
}

/// Builds dashboard reports from grouped queries.
pub struct ReportService<'a> {
    pool: &'a PgPool,
}

impl<'a> ReportService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn admin_stats(&self) -> Result<AdminStats, RepositoryError> {
        let users = UserRepository::new(self.pool);
        let tenants = TenantRepository::new(self.pool);
        let orders = OrderRepository::new(self.pool);

        Ok(AdminStats {
            total_users: users.count_all().await?,
            total_tenants: users.count_by_role(Role::Tenant).await?,
            total_revenue: tenants.total_revenue().await?,
            shop_revenue: tenants.revenue_by_shop().await?,
            occupancy_rate: OCCUPANCY_RATE,
            monthly_revenue: reports::monthly_revenue(orders.revenue_by_month().await?),
        })
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn analytics(&self) -> Result<MallAnalytics, RepositoryError> {
        let categories = TenantRepository::new(self.pool).category_counts().await?;
        let weekdays = OrderRepository::new(self.pool).count_by_weekday().await?;

        Ok(MallAnalytics {
            category_data: reports::category_shares(categories),
            traffic_data: reports::weekly_traffic(weekdays),
        })
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn shop_stats(&self, tenant: Tenant) -> Result<ShopStats, RepositoryError> {
        let total_products = ProductRepository::new(self.pool)
            .count_for_tenant(tenant.id)
            .await?;

        Ok(ShopStats {
            shop_name: tenant.shop_name,
            image_url: tenant.image_url,
            description: tenant.description,
            category: tenant.category,
            total_products,
            total_sales: tenant.account_balance,
        })
    }
}
