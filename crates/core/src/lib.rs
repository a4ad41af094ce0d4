//! Queens Mall Core - Domain types and rules.
//!
//! This crate provides the types and pure business rules shared by the
//! Queens Mall components:
//! - `api` - REST backend for admins, tenants and customers
//! - `cli` - Command-line tools for migrations, admin accounts and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. Database encodings for the types are available behind the
//! `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, roles, order statuses, loyalty tiers, usernames and emails
//! - [`order`] - Cart validation and settlement arithmetic
//! - [`money`] - Price and order total bounds
//! - [`limits`] - Text column widths
//! - [`time`] - Timestamp parsing and rendering
//! - [`reports`] - Bucketing for the admin dashboard

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod limits;
pub mod money;
pub mod order;
pub mod reports;
pub mod time;
pub mod types;

pub use types::*;
