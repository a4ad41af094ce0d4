//! Authentication error types.

use thiserror::Error;

use queens_mall_core::limits::TooLong;
use queens_mall_core::{EmailError, RoleError, UsernameError};

use crate::db::RepositoryError;

/// Errors that can occur during registration and login.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Invalid username.
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    /// Role string is not one of the known roles.
    #[error("Invalid role: {0}")]
    UnknownRole(#[from] RoleError),

    /// Role cannot be obtained through self-registration.
    #[error("Unauthorized role registration")]
    RoleNotAllowed,

    /// Wrong password or unknown username.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Username or email already registered.
    #[error("User already exists")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("{0}")]
    WeakPassword(String),

    /// Shop details longer than their columns.
    #[error(transparent)]
    TooLong(#[from] TooLong),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
