//! End-to-end tests for the Queens Mall API.
//!
//! # Running Tests
//!
//! ```bash
//! qm-cli migrate
//! cargo run -p queens-mall-api &
//! cargo test -p queens-mall-integration-tests -- --ignored
//! ```
//!
//! `MALL_API_URL` points at the running server (default
//! `http://localhost:5000`). `MALL_DATABASE_URL` must name the same database
//! so admin accounts can be created directly.

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use reqwest::{Client, Response, StatusCode};
use secrecy::SecretString;
use serde_json::{Value, json};
use sqlx::PgPool;

use queens_mall_api::db;
use queens_mall_api::services::AuthService;

/// Password used for every account the tests create.
pub const PASSWORD: &str = "integration-pass-1";

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("MALL_API_URL").unwrap_or_else(|_| "http://localhost:5000".to_owned())
}

/// A name no other test run has used.
#[must_use]
pub fn unique(prefix: &str) -> String {
    format!("{prefix}_{}", uuid::Uuid::new_v4().simple())
}

/// HTTP client plus a pool on the server's database.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub pool: PgPool,
}

impl TestContext {
    pub async fn new() -> Self {
        let database_url = std::env::var("MALL_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .map(SecretString::from)
            .expect("MALL_DATABASE_URL must be set");

        Self {
            client: Client::new(),
            base_url: base_url(),
            pool: db::create_pool(&database_url)
                .await
                .expect("Failed to connect to database"),
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn get(&self, path: &str, token: &str) -> Response {
        self.client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("GET failed")
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: &Value) -> Response {
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("POST failed")
    }

    pub async fn put(&self, path: &str, token: &str, body: &Value) -> Response {
        self.client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("PUT failed")
    }

    /// Register through the API and return the response.
    pub async fn register(&self, username: &str, role: &str, extra: Value) -> Response {
        let mut body = json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": PASSWORD,
            "role": role,
        });
        if let (Some(body), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
            body.extend(extra.clone());
        }
        self.post("/auth/register", None, &body).await
    }

    pub async fn login(&self, username: &str) -> String {
        let resp = self
            .post(
                "/auth/login",
                None,
                &json!({"username": username, "password": PASSWORD}),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.expect("login body");
        body["access_token"]
            .as_str()
            .expect("access_token")
            .to_owned()
    }

    /// A fresh customer; returns its token.
    pub async fn customer(&self) -> String {
        let username = unique("cust");
        let resp = self.register(&username, "customer", json!({})).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        self.login(&username).await
    }

    /// A fresh admin created directly in the database; returns its token.
    pub async fn admin(&self) -> String {
        let username = unique("admin");
        AuthService::new(&self.pool)
            .create_admin(&username, &format!("{username}@example.com"), PASSWORD)
            .await
            .expect("create admin");
        self.login(&username).await
    }

    /// A fresh, approved tenant; returns its token and shop id.
    pub async fn approved_tenant(&self, admin_token: &str) -> (String, i64) {
        let username = unique("shop");
        let resp = self
            .register(
                &username,
                "tenant",
                json!({"shop_name": format!("{username} store"), "category": "Fashion"}),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let token = self.login(&username).await;

        let shop: Value = self
            .get("/tenant/profile", &token)
            .await
            .json()
            .await
            .expect("profile body");
        let shop_id = shop["id"].as_i64().expect("shop id");

        let resp = self
            .post(
                &format!("/admin/tenants/{shop_id}/approve"),
                Some(admin_token),
                &json!({}),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);

        (token, shop_id)
    }

    /// Create a product in the tenant's shop; returns its id.
    pub async fn product(&self, tenant_token: &str, price: f64, stock: i32) -> i64 {
        let resp = self
            .post(
                "/tenant/products",
                Some(tenant_token),
                &json!({"name": unique("item"), "price": price, "stock": stock}),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = resp.json().await.expect("product body");
        body["id"].as_i64().expect("product id")
    }

    /// Place an order and return its id.
    pub async fn order(&self, customer_token: &str, items: Value, delivery: Value) -> i64 {
        let resp = self
            .post(
                "/customer/orders",
                Some(customer_token),
                &json!({"items": items, "delivery_info": delivery}),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = resp.json().await.expect("order body");
        body["order_id"].as_i64().expect("order id")
    }
}

/// Find an element of a JSON array by its `id`.
#[must_use]
pub fn find_by_id(list: &Value, id: i64) -> Option<&Value> {
    list.as_array()?.iter().find(|v| v["id"].as_i64() == Some(id))
}
