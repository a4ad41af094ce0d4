//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Registration and password login
//! - `tokens` - Bearer token signing and verification
//! - `orders` - Order placement, expiry, fulfillment and status changes
//! - `reports` - Admin and shop dashboards
//! - `expiry` - Background sweep of overdue orders

pub mod auth;
pub mod expiry;
pub mod orders;
pub mod reports;
pub mod tokens;

pub use auth::{AuthError, AuthService, Registration};
pub use orders::{DeliveryRequest, OrderError, OrderService};
pub use reports::ReportService;
pub use tokens::{Claims, TokenError, TokenService};
