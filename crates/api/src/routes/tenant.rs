//! Shop owner endpoints.
//!
//! The caller's shop is created on demand (unapproved) if the account has
//! none yet. Products belonging to other shops are reported as missing.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use queens_mall_core::money::check_price;
use queens_mall_core::{OrderId, OrderStatus, ProductId};

use crate::db::products::ProductDraft;
use crate::db::{ProductRepository, TenantRepository};
use crate::error::AppError;
use crate::extract::{Json, Path};
use crate::middleware::{AuthUser, RequireTenant};
use crate::models::{FulfillmentOrder, NewProduct, Product, ProductUpdate, Tenant, TenantProfileUpdate};
use crate::services::reports::ShopStats;
use crate::services::{OrderService, ReportService};
use crate::state::AppState;

use super::MessageResponse;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tenant/profile", get(get_profile).put(update_profile))
        .route("/tenant/stats", get(get_stats))
        .route("/tenant/products", get(list_products).post(create_product))
        .route(
            "/tenant/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/tenant/orders", get(list_orders))
        .route("/tenant/orders/{id}/status", put(update_order_status))
}

const PRODUCT_NOT_FOUND: &str = "Product not found";

/// The caller's shop.
async fn current_shop(state: &AppState, user: &AuthUser) -> Result<Tenant, AppError> {
    Ok(TenantRepository::new(state.pool())
        .get_or_create_for_user(user.id)
        .await?)
}

// =============================================================================
// Profile
// =============================================================================

async fn get_profile(
    RequireTenant(user): RequireTenant,
    State(state): State<AppState>,
) -> Result<Json<Tenant>, AppError> {
    Ok(Json(current_shop(&state, &user).await?))
}

#[instrument(skip_all, fields(user_id = %user.id))]
async fn update_profile(
    RequireTenant(user): RequireTenant,
    State(state): State<AppState>,
    Json(body): Json<TenantProfileUpdate>,
) -> Result<Json<Tenant>, AppError> {
    if body
        .shop_name
        .as_deref()
        .is_some_and(|name| name.trim().is_empty())
    {
        return Err(AppError::BadRequest("shop_name cannot be empty".to_owned()));
    }
    body.check_lengths()?;

    let shop = current_shop(&state, &user).await?;
    let updated = TenantRepository::new(state.pool())
        .update_profile(shop.id, &body)
        .await?;

    Ok(Json(updated))
}

async fn get_stats(
    RequireTenant(user): RequireTenant,
    State(state): State<AppState>,
) -> Result<Json<ShopStats>, AppError> {
    let shop = current_shop(&state, &user).await?;
    let stats = ReportService::new(state.pool()).shop_stats(shop).await?;
    Ok(Json(stats))
}

// =============================================================================
// Products
// =============================================================================

fn check_stock(stock: i32) -> Result<(), AppError> {
    if stock < 0 {
        return Err(AppError::BadRequest("stock must not be negative".to_owned()));
    }
    Ok(())
}

async fn list_products(
    RequireTenant(user): RequireTenant,
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, AppError> {
    let shop = current_shop(&state, &user).await?;
    let products = ProductRepository::new(state.pool())
        .list_for_tenant(shop.id)
        .await?;
    Ok(Json(products))
}

async fn get_product(
    RequireTenant(user): RequireTenant,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>, AppError> {
    let shop = current_shop(&state, &user).await?;
    ProductRepository::new(state.pool())
        .get_for_tenant(shop.id, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.to_owned()))
}

#[instrument(skip_all, fields(user_id = %user.id))]
async fn create_product(
    RequireTenant(user): RequireTenant,
    State(state): State<AppState>,
    Json(body): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".to_owned()));
    }
    body.check_lengths()?;
    let price = body
        .price
        .ok_or_else(|| AppError::BadRequest("price is required".to_owned()))?;
    check_price(price)?;
    check_stock(body.stock)?;

    let shop = current_shop(&state, &user).await?;
    if !shop.is_approved {
        return Err(AppError::Forbidden(
            "Shop not approved. Please contact admin.".to_owned(),
        ));
    }

    let product = ProductRepository::new(state.pool())
        .create(
            shop.id,
            &ProductDraft {
                name,
                description: body.description.as_deref(),
                price,
                stock: body.stock,
                image_url: body.image_url.as_deref(),
            },
        )
        .await?;

    tracing::info!(product_id = %product.id, tenant_id = %shop.id, "Product created");

    Ok((StatusCode::CREATED, Json(product)))
}

#[instrument(skip_all, fields(user_id = %user.id, product_id = %id))]
async fn update_product(
    RequireTenant(user): RequireTenant,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(body): Json<ProductUpdate>,
) -> Result<Json<Product>, AppError> {
    if body.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::BadRequest("name cannot be empty".to_owned()));
    }
    body.check_lengths()?;
    if let Some(price) = body.price {
        check_price(price)?;
    }
    if let Some(stock) = body.stock {
        check_stock(stock)?;
    }

    let shop = current_shop(&state, &user).await?;
    ProductRepository::new(state.pool())
        .update(shop.id, id, &body)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.to_owned()))
}

#[instrument(skip_all, fields(user_id = %user.id, product_id = %id))]
async fn delete_product(
    RequireTenant(user): RequireTenant,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<MessageResponse>, AppError> {
    let shop = current_shop(&state, &user).await?;
    let deleted = ProductRepository::new(state.pool())
        .delete(shop.id, id)
        .await?;

    if !deleted {
        return Err(AppError::NotFound(PRODUCT_NOT_FOUND.to_owned()));
    }

    Ok(Json(MessageResponse::new("Product deleted")))
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: String,
    pub status: OrderStatus,
}

async fn list_orders(
    RequireTenant(user): RequireTenant,
    State(state): State<AppState>,
) -> Result<Json<Vec<FulfillmentOrder>>, AppError> {
    let shop = current_shop(&state, &user).await?;
    let orders = OrderService::new(state.pool()).fulfillment(shop.id).await?;
    Ok(Json(orders))
}

#[instrument(skip_all, fields(user_id = %user.id, order_id = %id))]
async fn update_order_status(
    RequireTenant(user): RequireTenant,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    let shop = current_shop(&state, &user).await?;
    let status = OrderService::new(state.pool())
        .set_status(shop.id, id, body.status.trim())
        .await?;

    Ok(Json(StatusResponse {
        message: format!("Order status updated to {status}"),
        status,
    }))
}
