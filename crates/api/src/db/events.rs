//! Event repository.
//!
//! Writes take an optional owning shop: `None` means an admin acting on any
//! event, `Some(id)` restricts the statement to that shop's events.

use chrono::{DateTime, NaiveTime, Utc};
use sqlx::PgPool;

use queens_mall_core::{EventId, TenantId};

use super::RepositoryError;
use crate::models::event::{Event, EventInput};

const EVENT_COLUMNS: &str = "id, name, description, date, tenant_id, image_url";

/// Repository for event database operations.
pub struct EventRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EventRepository<'a> {
    /// Create a new event repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Events on or after the start of `today` (UTC), soonest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_upcoming(&self, now: DateTime<Utc>) -> Result<Vec<Event>, RepositoryError> {
        let start_of_day = now.date_naive().and_time(NaiveTime::MIN).and_utc();

        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM mall.event WHERE date >= $1 ORDER BY date, id"
        ))
        .bind(start_of_day)
        .fetch_all(self.pool)
        .await?;
        Ok(events)
    }

    /// Create an event. `tenant_id` is `None` for mall-wide events.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        tenant_id: Option<TenantId>,
        name: &str,
        date: DateTime<Utc>,
        description: Option<&str>,
        image_url: Option<&str>,
    ) -> Result<Event, RepositoryError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r"
            INSERT INTO mall.event (name, description, date, tenant_id, image_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {EVENT_COLUMNS}
            "
        ))
        .bind(name)
        .bind(description)
        .bind(date)
        .bind(tenant_id)
        .bind(image_url)
        .fetch_one(self.pool)
        .await?;
        Ok(event)
    }

    /// Apply a partial update. Returns `None` when no event matched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: EventId,
        owner: Option<TenantId>,
        input: &EventInput,
    ) -> Result<Option<Event>, RepositoryError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r"
            UPDATE mall.event
            SET name        = COALESCE($3, name),
                description = COALESCE($4, description),
                date        = COALESCE($5, date),
                image_url   = COALESCE($6, image_url)
            WHERE id = $1 AND ($2::INT IS NULL OR tenant_id = $2)
            RETURNING {EVENT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(owner)
        .bind(input.name.as_deref().map(str::trim))
        .bind(input.description.as_deref())
        .bind(input.date)
        .bind(input.image_url.as_deref())
        .fetch_optional(self.pool)
        .await?;
        Ok(event)
    }

    /// Delete an event. Returns `false` when no event matched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: EventId, owner: Option<TenantId>) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM mall.event WHERE id = $1 AND ($2::INT IS NULL OR tenant_id = $2)",
        )
        .bind(id)
        .bind(owner)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count all events.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM mall.event")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
