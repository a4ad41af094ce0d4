//! Demo data for a fresh mall.

use chrono::{DateTime, Duration, Utc};

use queens_mall_api::db::{EventRepository, RepositoryError};

use super::{CommandError, connect};

/// Demo events as (name, description, days from now, image).
const DEMO_EVENTS: &[(&str, &str, i64, &str)] = &[
    (
        "Kids Carnival",
        "Fun games and prizes for kids.",
        14,
        "https://source.unsplash.com/random?carnival",
    ),
    (
        "Summer Music Fest",
        "Live music at the central atrium!",
        30,
        "https://source.unsplash.com/random?concert",
    ),
    (
        "Mega Sale",
        "Up to 50% off in all electronic stores.",
        45,
        "https://source.unsplash.com/random?sale",
    ),
];

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Connect(#[from] CommandError),

    #[error("Seeding failed: {0}")]
    Repository(#[from] RepositoryError),
}

/// Insert the demo mall-wide events unless events already exist.
///
/// Returns the number of events inserted.
///
/// # Errors
///
/// Returns `SeedError` if the database is unreachable or an insert fails.
pub async fn events() -> Result<usize, SeedError> {
    let pool = connect().await?;
    let repo = EventRepository::new(&pool);

    let existing = repo.count().await?;
    if existing > 0 {
        tracing::info!(existing, "Events already present, skipping seed");
        return Ok(0);
    }

    let now = Utc::now();
    for &(name, description, days, image_url) in DEMO_EVENTS {
        let event = repo
            .create(
                None,
                name,
                event_date(now, days),
                Some(description),
                Some(image_url),
            )
            .await?;
        tracing::info!(event_id = %event.id, name, "Seeded event");
    }

    tracing::info!(inserted = DEMO_EVENTS.len(), "Seeding complete!");
    Ok(DEMO_EVENTS.len())
}

fn event_date(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now + Duration::days(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_events_are_upcoming() {
        let now = Utc::now();
        assert!(
            DEMO_EVENTS
                .iter()
                .all(|(_, _, days, _)| event_date(now, *days) > now)
        );
    }
}
