//! Admin account management.
//!
//! Admin accounts cannot be self-registered over the API; this command is
//! the only way to create one.
//!
//! ```bash
//! MALL_ADMIN_PASSWORD='...' qm-cli admin create -u admin -e admin@example.com
//! ```

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use queens_mall_api::services::{AuthError, AuthService};
use queens_mall_core::UserId;

use super::{CommandError, connect};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Connect(#[from] CommandError),

    #[error("Admin password required: pass -p or set MALL_ADMIN_PASSWORD")]
    MissingPassword,

    #[error("Could not create admin: {0}")]
    Account(#[from] AuthError),
}

/// Create an admin account.
///
/// # Errors
///
/// Returns `AdminError` if the password is missing, the details are invalid,
/// the username or email is taken, or the database is unreachable.
pub async fn create(
    username: &str,
    email: &str,
    password: Option<SecretString>,
) -> Result<UserId, AdminError> {
    let password = password.ok_or(AdminError::MissingPassword)?;
    let pool = connect().await?;

    tracing::info!(username, email, "Creating admin account");

    let user = AuthService::new(&pool)
        .create_admin(username, email, password.expose_secret())
        .await?;

    tracing::info!(user_id = %user.id, "Admin account created successfully!");
    Ok(user.id)
}
