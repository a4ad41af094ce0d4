//! HTTP middleware and auth extractors.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (recorded on the span)
//! 4. CORS

pub mod auth;
pub mod request_id;

pub use auth::{AuthUser, RequireAdmin, RequireCustomer, RequireStaff, RequireTenant};
pub use request_id::request_id_middleware;
