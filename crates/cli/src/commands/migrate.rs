//! Database migration command.
//!
//! ```bash
//! qm-cli migrate
//! ```
//!
//! Migrations live in `crates/api/migrations/` and are embedded in the API
//! crate at build time.

use thiserror::Error;

use queens_mall_api::db::MIGRATOR;

use super::{CommandError, connect};

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Connect(#[from] CommandError),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Apply pending migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let pool = connect().await?;

    tracing::info!(available = MIGRATOR.iter().count(), "Running mall migrations...");
    MIGRATOR.run(&pool).await?;

    tracing::info!("Mall migrations complete!");
    Ok(())
}
