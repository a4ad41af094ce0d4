//! Core types for Queens Mall.
//!
//! This module provides type-safe wrappers for the marketplace's domain concepts.

pub mod email;
pub mod id;
pub mod loyalty;
pub mod role;
pub mod status;
pub mod username;

pub use email::{Email, EmailError};
pub use id::*;
pub use loyalty::LoyaltyTier;
pub use role::{Role, RoleError};
pub use status::{OrderStatus, OrderStatusError};
pub use username::{Username, UsernameError};
