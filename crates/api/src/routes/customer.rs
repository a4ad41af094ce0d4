//! Shopper endpoints: public shop browsing plus orders, loyalty profile and
//! wishlist for customer accounts.

use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use queens_mall_core::order::CartLine;
use queens_mall_core::{OrderId, ProductId, TenantId};

use crate::db::{
    CustomerRepository, ProductRepository, RepositoryError, TenantRepository, WishlistRepository,
};
use crate::error::AppError;
use crate::extract::{Json, Path};
use crate::middleware::RequireCustomer;
use crate::models::{CustomerOrder, CustomerProfileView, Product, Tenant};
use crate::services::{DeliveryRequest, OrderService};
use crate::state::AppState;

use super::MessageResponse;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/customer/orders", get(list_orders).post(place_order))
        .route("/customer/shops", get(list_shops))
        .route("/customer/shops/{id}", get(get_shop))
        .route("/customer/shops/{id}/products", get(list_shop_products))
        .route("/customer/profile", get(get_profile))
        .route(
            "/customer/wishlist",
            get(get_wishlist)
                .post(add_to_wishlist)
                .put(add_to_wishlist)
                .delete(remove_from_wishlist),
        )
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct DeliveryInfo {
    pub address: Option<String>,
    pub contact: Option<String>,
    pub delivery_time: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    #[serde(default)]
    pub items: Vec<CartLine>,
    #[serde(default)]
    pub delivery_info: DeliveryInfo,
}

#[derive(Debug, Serialize)]
pub struct PlaceOrderResponse {
    pub message: &'static str,
    pub order_id: OrderId,
}

#[instrument(skip_all, fields(user_id = %user.id))]
async fn list_orders(
    RequireCustomer(user): RequireCustomer,
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerOrder>>, AppError> {
    let orders = OrderService::new(state.pool()).history(user.id).await?;
    Ok(Json(orders))
}

#[instrument(skip_all, fields(user_id = %user.id))]
async fn place_order(
    RequireCustomer(user): RequireCustomer,
    State(state): State<AppState>,
    Json(body): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<PlaceOrderResponse>), AppError> {
    let delivery = DeliveryRequest {
        address: body.delivery_info.address.as_deref(),
        contact: body.delivery_info.contact.as_deref(),
        delivery_time: body.delivery_info.delivery_time.as_deref(),
    };

    let placed = OrderService::new(state.pool())
        .place(user.id, &body.items, delivery)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PlaceOrderResponse {
            message: "Order placed successfully",
            order_id: placed.id,
        }),
    ))
}

// =============================================================================
// Shops (public)
// =============================================================================

async fn list_shops(State(state): State<AppState>) -> Result<Json<Vec<Tenant>>, AppError> {
    let shops = TenantRepository::new(state.pool()).list_approved().await?;
    Ok(Json(shops))
}

async fn get_shop(
    State(state): State<AppState>,
    Path(id): Path<TenantId>,
) -> Result<Json<Tenant>, AppError> {
    TenantRepository::new(state.pool())
        .get_approved(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Shop not found".to_owned()))
}

async fn list_shop_products(
    State(state): State<AppState>,
    Path(id): Path<TenantId>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = ProductRepository::new(state.pool())
        .list_for_approved_shop(id)
        .await?;
    Ok(Json(products))
}

// =============================================================================
// Profile
// =============================================================================

async fn get_profile(
    RequireCustomer(user): RequireCustomer,
    State(state): State<AppState>,
) -> Result<Json<CustomerProfileView>, AppError> {
    let profile = CustomerRepository::new(state.pool())
        .get_or_create_profile(user.id)
        .await?;
    Ok(Json(profile))
}

// =============================================================================
// Wishlist
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct WishlistRequest {
    pub product_id: Option<ProductId>,
}

impl WishlistRequest {
    fn product_id(&self) -> Result<ProductId, AppError> {
        self.product_id
            .ok_or_else(|| AppError::BadRequest("Product ID required".to_owned()))
    }
}

async fn get_wishlist(
    RequireCustomer(user): RequireCustomer,
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = WishlistRepository::new(state.pool())
        .list_products(user.id)
        .await?;
    Ok(Json(products))
}

async fn add_to_wishlist(
    RequireCustomer(user): RequireCustomer,
    State(state): State<AppState>,
    Json(body): Json<WishlistRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let product_id = body.product_id()?;

    let added = WishlistRepository::new(state.pool())
        .add(user.id, product_id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Product not found".to_owned()),
            other => other.into(),
        })?;

    Ok(if added {
        (StatusCode::CREATED, Json(MessageResponse::new("Added to wishlist")))
    } else {
        (StatusCode::OK, Json(MessageResponse::new("Already in wishlist")))
    })
}

async fn remove_from_wishlist(
    RequireCustomer(user): RequireCustomer,
    State(state): State<AppState>,
    Json(body): Json<WishlistRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let product_id = body.product_id()?;

    WishlistRepository::new(state.pool())
        .remove(user.id, product_id)
        .await?;

    Ok(Json(MessageResponse::new("Removed from wishlist")))
}
