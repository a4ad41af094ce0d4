//! Welcome and health endpoints.

use axum::{Router, extract::State, http::StatusCode, routing::get};

use crate::extract::Json;
use crate::state::AppState;

use super::MessageResponse;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
}

async fn index() -> Json<MessageResponse> {
    Json(MessageResponse::new("Welcome to the Queens Mall API"))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").execute(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
