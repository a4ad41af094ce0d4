//! Registration and login against a running server.
//!
//! Run with: `cargo test -p queens-mall-integration-tests -- --ignored`

use queens_mall_integration_tests::{TestContext, unique};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_admin_role_cannot_self_register() {
    let ctx = TestContext::new().await;
    let resp = ctx.register(&unique("eve"), "admin", json!({})).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_tenant_registration_creates_unapproved_shop() {
    let ctx = TestContext::new().await;
    let username = unique("shop");
    let resp = ctx
        .register(&username, "tenant", json!({"shop_name": "Corner Books"}))
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let token = ctx.login(&username).await;
    let shop: Value = ctx.get("/tenant/profile", &token).await.json().await.unwrap();
    assert_eq!(shop["shop_name"], "Corner Books");
    assert_eq!(shop["is_approved"], false);

    // Unapproved shops cannot list products
    let resp = ctx
        .post(
            "/tenant/products",
            Some(&token),
            &json!({"name": "Atlas", "price": 12.5, "stock": 3}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_duplicate_username_rejected() {
    let ctx = TestContext::new().await;
    let username = unique("dup");
    assert_eq!(
        ctx.register(&username, "customer", json!({})).await.status(),
        StatusCode::CREATED
    );
    assert_eq!(
        ctx.register(&username, "customer", json!({})).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_wrong_password_is_unauthorized() {
    let ctx = TestContext::new().await;
    let username = unique("cust");
    ctx.register(&username, "customer", json!({})).await;

    let resp = ctx
        .post(
            "/auth/login",
            None,
            &json!({"username": username, "password": "not-the-password"}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_login_reports_role() {
    let ctx = TestContext::new().await;
    let username = unique("cust");
    ctx.register(&username, "customer", json!({})).await;

    let body: Value = ctx
        .post(
            "/auth/login",
            None,
            &json!({"username": username, "password": queens_mall_integration_tests::PASSWORD}),
        )
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["role"], "customer");
    assert_eq!(body["username"], username);
}
