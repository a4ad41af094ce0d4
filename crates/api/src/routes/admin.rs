//! Mall administration endpoints.

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use serde::Serialize;
use tracing::instrument;

use queens_mall_core::TenantId;

use crate::db::TenantRepository;
use crate::error::AppError;
use crate::extract::{Json, Path};
use crate::middleware::RequireAdmin;
use crate::models::Tenant;
use crate::services::ReportService;
use crate::services::reports::{AdminStats, MallAnalytics};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/tenants", get(list_tenants))
        .route("/admin/tenants/{id}/approve", post(toggle_approval))
        .route("/admin/stats", get(stats))
        .route("/admin/analytics", get(analytics))
}

#[derive(Debug, Serialize)]
pub struct ApprovalResponse {
    pub message: String,
    pub is_approved: bool,
}

async fn list_tenants(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Tenant>>, AppError> {
    let tenants = TenantRepository::new(state.pool()).list_all().await?;
    Ok(Json(tenants))
}

/// Flip a shop's approval flag.
#[instrument(skip_all, fields(admin_id = %admin.id, tenant_id = %id))]
async fn toggle_approval(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<TenantId>,
) -> Result<Json<ApprovalResponse>, AppError> {
    let is_approved = TenantRepository::new(state.pool())
        .toggle_approval(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tenant not found".to_owned()))?;

    tracing::info!(is_approved, "Tenant approval changed");

    let verb = if is_approved { "approved" } else { "unapproved" };
    Ok(Json(ApprovalResponse {
        message: format!("Tenant {verb} successfully"),
        is_approved,
    }))
}

async fn stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<AdminStats>, AppError> {
    Ok(Json(ReportService::new(state.pool()).admin_stats().await?))
}

async fn analytics(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<MallAnalytics>, AppError> {
    Ok(Json(ReportService::new(state.pool()).analytics().await?))
}
