//! Shops, products, wishlist and events against a running server.
//!
//! Run with: `cargo test -p queens-mall-integration-tests -- --ignored`

use queens_mall_integration_tests::{TestContext, find_by_id};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_product_round_trip_keeps_price_and_stock() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin().await;
    let (tenant, _) = ctx.approved_tenant(&admin).await;
    let product = ctx.product(&tenant, 9.99, 5).await;

    let body: Value = ctx
        .get(&format!("/tenant/products/{product}"), &tenant)
        .await
        .json()
        .await
        .unwrap();
    assert!((body["price"].as_f64().unwrap() - 9.99).abs() < 1e-9);
    assert_eq!(body["stock"], 5);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_other_tenants_products_are_hidden() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin().await;
    let (owner, _) = ctx.approved_tenant(&admin).await;
    let (intruder, _) = ctx.approved_tenant(&admin).await;
    let product = ctx.product(&owner, 2.0, 1).await;

    let resp = ctx
        .get(&format!("/tenant/products/{product}"), &intruder)
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_public_shop_listing_shows_approved_shops() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin().await;
    let (tenant, shop_id) = ctx.approved_tenant(&admin).await;
    let product = ctx.product(&tenant, 5.0, 2).await;

    let shops: Value = ctx
        .client
        .get(ctx.url("/customer/shops"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(find_by_id(&shops, shop_id).is_some());

    let products: Value = ctx
        .client
        .get(ctx.url(&format!("/customer/shops/{shop_id}/products")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(find_by_id(&products, product).is_some());
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_wishlist_add_is_idempotent() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin().await;
    let (tenant, _) = ctx.approved_tenant(&admin).await;
    let product = ctx.product(&tenant, 5.0, 2).await;
    let customer = ctx.customer().await;

    let body = json!({"product_id": product});
    let first = ctx.post("/customer/wishlist", Some(&customer), &body).await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let second = ctx.post("/customer/wishlist", Some(&customer), &body).await;
    assert_eq!(second.status(), StatusCode::OK);

    let wishlist: Value = ctx.get("/customer/wishlist", &customer).await.json().await.unwrap();
    assert_eq!(wishlist.as_array().unwrap().len(), 1);

    let resp = ctx
        .client
        .delete(ctx.url("/customer/wishlist"))
        .bearer_auth(&customer)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_admin_events_and_stats() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin().await;

    let resp = ctx
        .post(
            "/events",
            Some(&admin),
            &json!({"name": "Night Market", "date": "2099-03-01T18:00:00Z"}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let event: Value = resp.json().await.unwrap();
    let event_id = event["id"].as_i64().unwrap();

    let events: Value = ctx
        .client
        .get(ctx.url("/events"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(find_by_id(&events, event_id).is_some());

    let stats: Value = ctx.get("/admin/stats", &admin).await.json().await.unwrap();
    assert_eq!(stats["occupancy_rate"], 85);
    assert_eq!(stats["monthly_revenue"].as_array().unwrap().len(), 12);

    let analytics: Value = ctx.get("/admin/analytics", &admin).await.json().await.unwrap();
    assert_eq!(analytics["traffic_data"].as_array().unwrap().len(), 7);
}
