//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Welcome message
//! GET  /health                        - Liveness
//! GET  /health/ready                  - Readiness (database)
//!
//! # Auth
//! POST /auth/register                 - Register a tenant or customer
//! POST /auth/login                    - Exchange credentials for a token
//!
//! # Customer (public)
//! GET  /customer/shops                - Approved shops
//! GET  /customer/shops/{id}           - Approved shop detail
//! GET  /customer/shops/{id}/products  - Approved shop catalogue
//!
//! # Customer (customer token)
//! GET  /customer/orders               - Order history
//! POST /customer/orders               - Place an order
//! GET  /customer/profile              - Loyalty profile
//! GET|POST|PUT|DELETE /customer/wishlist
//!
//! # Tenant (tenant token)
//! GET|PUT /tenant/profile             - Shop profile
//! GET  /tenant/stats                  - Shop dashboard
//! GET|POST /tenant/products
//! GET|PUT|DELETE /tenant/products/{id}
//! GET  /tenant/orders                 - Fulfillment view
//! PUT  /tenant/orders/{id}/status     - Complete or cancel
//!
//! # Events
//! GET  /events                        - Upcoming events (public)
//! POST /events                        - Create (admin or tenant)
//! PUT|DELETE /events/{id}             - Modify (admin any, tenant own)
//!
//! # Admin (admin token)
//! GET  /admin/tenants
//! POST /admin/tenants/{id}/approve    - Toggle approval
//! GET  /admin/stats
//! GET  /admin/analytics
//! ```

pub mod admin;
pub mod auth;
pub mod customer;
pub mod events;
pub mod health;
pub mod tenant;

use axum::Router;
use serde::Serialize;

use crate::state::AppState;

/// Build the complete router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(customer::router())
        .merge(tenant::router())
        .merge(events::router())
        .merge(admin::router())
}

/// `{"message": "..."}` body for acknowledgements.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
