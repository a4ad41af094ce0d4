//! Queens Mall API library.
//!
//! REST backend for a mall marketplace: admins approve shops and watch the
//! dashboards, tenants run their shop's catalogue and fulfil orders,
//! customers browse shops, place orders and collect loyalty points.
//!
//! The binary in `main.rs` wires configuration, tracing and Sentry around
//! [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// Build the application router with its middleware stack.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config().cors_origins);

    Router::new()
        .merge(routes::routes())
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .layer(cors)
        .with_state(state)
}

/// CORS for browser clients. An empty origin list allows any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if allowed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(allowed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use chrono::Utc;
    use queens_mall_core::{Role, UserId};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::config::MallConfig;
    use crate::models::user::User;

    fn state() -> AppState {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/queens_mall_test")
            .unwrap();
        AppState::new(MallConfig::for_tests(), pool)
    }

    fn bearer(state: &AppState, role: Role) -> String {
        let user = User {
            id: UserId::new(11),
            username: "kim".to_owned(),
            email: "kim@example.com".to_owned(),
            role,
            created_at: Utc::now(),
        };
        format!("Bearer {}", state.tokens().issue(&user).unwrap())
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    fn post_json(uri: &str, body: &str, auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::from(body.to_owned())).unwrap()
    }

    #[tokio::test]
    async fn test_liveness() {
        let response = app(state())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_welcome() {
        let (status, body) = send(
            app(state()),
            Request::builder().uri("/").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].as_str().unwrap().contains("Queens Mall"));
    }

    #[tokio::test]
    async fn test_orders_require_token() {
        let (status, body) = send(
            app(state()),
            Request::builder()
                .uri("/customer/orders")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Missing authorization header");
    }

    #[tokio::test]
    async fn test_customer_cannot_read_admin_stats() {
        let state = state();
        let auth = bearer(&state, Role::Customer);
        let (status, _) = send(
            app(state),
            Request::builder()
                .uri("/admin/stats")
                .header(header::AUTHORIZATION, auth)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_self_registration_forbidden() {
        let body = r#"{"username":"eve","email":"eve@example.com","password":"hunter2hunter2","role":"admin"}"#;
        let (status, json) = send(app(state()), post_json("/auth/register", body, None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["message"], "Unauthorized role registration");
    }

    #[tokio::test]
    async fn test_unknown_role_is_bad_request() {
        let body = r#"{"username":"eve","email":"eve@example.com","password":"hunter2hunter2","role":"wizard"}"#;
        let (status, _) = send(app(state()), post_json("/auth/register", body, None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (status, json) = send(app(state()), post_json("/auth/login", "{not json", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["message"].is_string());
    }

    #[tokio::test]
    async fn test_empty_order_rejected_before_database() {
        let state = state();
        let auth = bearer(&state, Role::Customer);
        let (status, json) = send(
            app(state),
            post_json("/customer/orders", r#"{"items": []}"#, Some(&auth)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Order items required");
    }

    #[tokio::test]
    async fn test_bad_delivery_time_rejected_before_database() {
        let state = state();
        let auth = bearer(&state, Role::Customer);
        let body = r#"{"items":[{"id":1,"quantity":1}],"delivery_info":{"delivery_time":"soon"}}"#;
        let (status, _) = send(app(state), post_json("/customer/orders", body, Some(&auth))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_tenant_cannot_place_orders() {
        let state = state();
        let auth = bearer(&state, Role::Tenant);
        let (status, _) = send(
            app(state),
            post_json("/customer/orders", r#"{"items":[{"id":1}]}"#, Some(&auth)),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_customer_cannot_create_events() {
        let state = state();
        let auth = bearer(&state, Role::Customer);
        let body = r#"{"name":"Sale","date":"2030-01-01T10:00:00Z"}"#;
        let (status, _) = send(app(state), post_json("/events", body, Some(&auth))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    async fn tenant_create_product(body: &str) -> (StatusCode, serde_json::Value) {
        let state = state();
        let auth = bearer(&state, Role::Tenant);
        send(app(state), post_json("/tenant/products", body, Some(&auth))).await
    }

    #[tokio::test]
    async fn test_product_price_with_three_decimals_rejected() {
        let (status, json) = tenant_create_product(r#"{"name":"Mug","price":9.999}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "price must have at most 2 decimal places");
    }

    #[tokio::test]
    async fn test_product_price_beyond_column_rejected() {
        let (status, json) =
            tenant_create_product(r#"{"name":"Mug","price":100000000000}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "price must be below 10000000000");
    }

    #[tokio::test]
    async fn test_product_name_too_long_rejected() {
        let body = format!(r#"{{"name":"{}","price":5}}"#, "m".repeat(101));
        let (status, json) = tenant_create_product(&body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "name must be at most 100 characters");
    }

    #[tokio::test]
    async fn test_product_update_price_checked() {
        let state = state();
        let auth = bearer(&state, Role::Tenant);
        let request = Request::builder()
            .method("PUT")
            .uri("/tenant/products/1")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, auth)
            .body(Body::from(r#"{"price":0.001}"#))
            .unwrap();
        let (status, _) = send(app(state), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_long_shop_name_rejected_at_registration() {
        let body = format!(
            r#"{{"username":"stall","email":"stall@example.com","password":"hunter2hunter2","role":"tenant","shop_name":"{}"}}"#,
            "s".repeat(101)
        );
        let (status, json) = send(app(state()), post_json("/auth/register", &body, None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "shop_name must be at most 100 characters");
    }

    #[tokio::test]
    async fn test_long_delivery_address_rejected() {
        let state = state();
        let auth = bearer(&state, Role::Customer);
        let body = format!(
            r#"{{"items":[{{"id":1,"quantity":1}}],"delivery_info":{{"address":"{}"}}}}"#,
            "a".repeat(300)
        );
        let (status, json) =
            send(app(state), post_json("/customer/orders", &body, Some(&auth))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "address must be at most 255 characters");
    }

    #[tokio::test]
    async fn test_long_event_name_rejected() {
        let state = state();
        let auth = bearer(&state, Role::Admin);
        let body = format!(
            r#"{{"name":"{}","date":"2030-01-01T10:00:00Z"}}"#,
            "e".repeat(101)
        );
        let (status, _) = send(app(state), post_json("/events", &body, Some(&auth))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_cors_layer_builds_for_both_modes() {
        let _ = cors_layer(&[]);
        let _ = cors_layer(&["https://mall.example.com".to_owned()]);
    }
}
