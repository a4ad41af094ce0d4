//! Mall and shop events.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, put},
};
use chrono::Utc;
use tracing::instrument;

use queens_mall_core::{EventId, Role, TenantId};

use crate::db::{EventRepository, TenantRepository};
use crate::error::AppError;
use crate::extract::{Json, Path};
use crate::middleware::{AuthUser, RequireStaff};
use crate::models::{Event, EventInput};
use crate::state::AppState;

use super::MessageResponse;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/{id}", put(update_event).delete(delete_event))
}

const EVENT_NOT_FOUND: &str = "Event not found";

/// Shop an event write is scoped to. Admins act mall-wide.
async fn event_owner(state: &AppState, user: &AuthUser) -> Result<Option<TenantId>, AppError> {
    match user.role {
        Role::Admin => Ok(None),
        Role::Tenant => {
            let shop = TenantRepository::new(state.pool())
                .get_or_create_for_user(user.id)
                .await?;
            Ok(Some(shop.id))
        }
        Role::Customer => Err(AppError::Forbidden("Unauthorized".to_owned())),
    }
}

async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, AppError> {
    let events = EventRepository::new(state.pool())
        .list_upcoming(Utc::now())
        .await?;
    Ok(Json(events))
}

#[instrument(skip_all, fields(user_id = %user.id))]
async fn create_event(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Json(body): Json<EventInput>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    let name = body
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::BadRequest("name is required".to_owned()))?;
    let date = body
        .date
        .ok_or_else(|| AppError::BadRequest("date is required".to_owned()))?;
    body.check_lengths()?;

    let owner = event_owner(&state, &user).await?;
    let event = EventRepository::new(state.pool())
        .create(
            owner,
            name,
            date,
            body.description.as_deref(),
            body.image_url.as_deref(),
        )
        .await?;

    tracing::info!(event_id = %event.id, mall_wide = owner.is_none(), "Event created");

    Ok((StatusCode::CREATED, Json(event)))
}

#[instrument(skip_all, fields(user_id = %user.id, event_id = %id))]
async fn update_event(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<EventId>,
    Json(body): Json<EventInput>,
) -> Result<Json<Event>, AppError> {
    if body.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::BadRequest("name cannot be empty".to_owned()));
    }
    body.check_lengths()?;

    let owner = event_owner(&state, &user).await?;
    EventRepository::new(state.pool())
        .update(id, owner, &body)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(EVENT_NOT_FOUND.to_owned()))
}

#[instrument(skip_all, fields(user_id = %user.id, event_id = %id))]
async fn delete_event(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<EventId>,
) -> Result<Json<MessageResponse>, AppError> {
    let owner = event_owner(&state, &user).await?;
    if !EventRepository::new(state.pool()).delete(id, owner).await? {
        return Err(AppError::NotFound(EVENT_NOT_FOUND.to_owned()));
    }
    Ok(Json(MessageResponse::new("Event deleted")))
}
