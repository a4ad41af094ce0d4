//! Mall events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use queens_mall_core::limits::{self, TooLong};
use queens_mall_core::{EventId, TenantId};

/// A scheduled event. `tenant_id` is `None` for mall-wide events.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "queens_mall_core::time::rfc3339")]
    pub date: DateTime<Utc>,
    pub tenant_id: Option<TenantId>,
    pub image_url: Option<String>,
}

/// Event fields accepted on create and update.
///
/// On create `name` and `date` are required; on update every field is optional
/// and absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventInput {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, with = "queens_mall_core::time::rfc3339::option")]
    pub date: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
}

impl EventInput {
    /// Reject text fields longer than their columns.
    ///
    /// # Errors
    ///
    /// Returns the first field that is too long.
    pub fn check_lengths(&self) -> Result<(), TooLong> {
        limits::check_opt_len("name", self.name.as_deref().map(str::trim), limits::EVENT_NAME)?;
        limits::check_opt_len("image_url", self.image_url.as_deref().map(str::trim), limits::IMAGE_URL)
    }
}
