//! Background expiry of overdue pending orders.
//!
//! Listings already expire orders in their own scope before reading; this
//! task catches orders nobody is looking at.

use std::time::Duration;

use sqlx::PgPool;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::db::OrderRepository;

/// Spawn a task that expires overdue orders every `every`.
pub fn spawn_expiry_sweeper(pool: PgPool, every: Duration) -> JoinHandle<()> {
    info!(interval_secs = every.as_secs(), "Spawning order expiry sweeper");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            sweep_once(&pool).await;
        }
    })
}

async fn sweep_once(pool: &PgPool) {
    match OrderRepository::new(pool).expire_overdue().await {
        Ok(0) => debug!("No overdue orders"),
        Ok(expired) => info!(expired, "Expired overdue orders"),
        Err(e) => warn!(error = %e, "Order expiry sweep failed"),
    }
}
