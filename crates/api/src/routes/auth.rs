//! Registration and login.

use axum::{Router, extract::State, http::StatusCode, routing::post};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use queens_mall_core::Role;

use crate::error::AppError;
use crate::extract::Json;
use crate::services::{AuthService, Registration};
use crate::state::AppState;

use super::MessageResponse;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
    pub shop_name: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub role: Role,
    pub username: String,
}

/// Register a tenant or customer account.
#[instrument(skip_all, fields(username = %body.username))]
async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    AuthService::new(state.pool())
        .register(Registration {
            username: &body.username,
            email: &body.email,
            password: &body.password,
            role: body.role.as_deref(),
            shop_name: body.shop_name.as_deref(),
            category: body.category.as_deref(),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User created successfully")),
    ))
}

/// Exchange a username and password for an access token.
#[instrument(skip_all, fields(username = %body.username))]
async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = AuthService::new(state.pool())
        .login(&body.username, &body.password)
        .await?;

    let access_token = state.tokens().issue(&user)?;

    tracing::info!(user_id = %user.id, role = %user.role, "Login succeeded");

    Ok(Json(LoginResponse {
        access_token,
        role: user.role,
        username: user.username,
    }))
}
