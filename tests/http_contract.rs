mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use storefront_reviews_be::{
    build_app,
    config::{Config, StoreBackend},
    db::MemoryStore,
    state::AppState,
};
use tower::ServiceExt;

fn app() -> Router {
    let config = Config {
        port: 0,
        store_backend: StoreBackend::Memory,
        redis_url: None,
        jwt_secret: common::SECRET.into(),
        jwt_ttl_hours: 1,
        allowed_origins: vec!["http://localhost:3000".into()],
        rate_limit_per_minute: 1000,
        request_timeout_secs: 5,
        max_concurrent_requests: 64,
    };
    build_app(AppState::with_store(MemoryStore::new(), common::auth()), &config)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<String>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(body) => {
            request = request.header("content-type", "application/json");
            Body::from(body)
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn register(app: &Router, name: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/users",
        None,
        Some(json!({ "name": name, "email": format!("{name}@example.com") }).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["token"].as_str().unwrap().to_string()
}

async fn buy(app: &Router, token: &str, product: &str) {
    let (status, body) = send(
        app,
        "POST",
        "/api/orders",
        Some(token),
        Some(json!({ "items": [{ "productId": product, "quantity": 1 }] }).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["order"]["items"][0]["productId"], product);
}

fn review_body(product: &str, rating: f64, comment: &str) -> Option<String> {
    Some(json!({ "productId": product, "rating": rating, "comment": comment }).to_string())
}

#[tokio::test]
async fn full_review_flow() {
    let app = app();
    let token = register(&app, "ursula").await;
    buy(&app, &token, "p-1").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/reviews",
        Some(&token),
        review_body("p-1", 5.0, "great"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["review"]["rating"], 5);
    assert_eq!(body["review"]["product"], "p-1");
    assert!(body["review"]["createdAt"].is_string());

    let (status, body) = send(
        &app,
        "POST",
        "/api/reviews",
        Some(&token),
        review_body("p-1", 1.0, "meh"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "You have already reviewed this product." }));

    let (status, body) = send(&app, "GET", "/api/reviews/p-1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let reviews = body["reviews"].as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["comment"], "great");
    assert_eq!(reviews[0]["user"]["name"], "ursula");
}

#[tokio::test]
async fn unpurchased_product_is_forbidden() {
    let app = app();
    let token = register(&app, "ursula").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/reviews",
        Some(&token),
        review_body("q-1", 3.0, "ok"),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "error": "You can only review products you have purchased." }));
}

#[tokio::test]
async fn anonymous_callers_are_unauthenticated() {
    let app = app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/reviews",
        None,
        review_body("p-1", 5.0, "great"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Not authenticated" }));

    let (status, _) = send(
        &app,
        "POST",
        "/api/reviews",
        Some("garbage"),
        review_body("p-1", 5.0, "great"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Even an unparseable body reports the missing identity.
    let (status, body) = send(&app, "POST", "/api/reviews", None, Some("{not json".into())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Not authenticated" }));

    let (status, _) = send(
        &app,
        "POST",
        "/api/orders",
        None,
        Some(json!({ "items": [] }).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_and_out_of_range_payloads_are_bad_requests() {
    let app = app();
    let token = register(&app, "ursula").await;
    buy(&app, &token, "p-1").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/reviews",
        Some(&token),
        Some("{not json".into()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid request body" }));

    let (status, body) = send(
        &app,
        "POST",
        "/api/reviews",
        Some(&token),
        review_body("p-1", 9.0, "wow"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Rating must be a whole number between 1 and 5." }));

    let (status, body) = send(
        &app,
        "POST",
        "/api/reviews",
        Some(&token),
        Some(json!({ "productId": "p-1", "rating": "five" }).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request body");

    // Nothing above should have been stored.
    let (_, body) = send(&app, "GET", "/api/reviews/p-1", None, None).await;
    assert_eq!(body["reviews"], json!([]));
}

#[tokio::test]
async fn registering_twice_signs_the_user_back_in() {
    let app = app();
    register(&app, "ursula").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/users",
        None,
        Some(json!({ "name": "Ursula", "email": "URSULA@example.com" }).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
}

#[tokio::test]
async fn empty_orders_are_rejected() {
    let app = app();
    let token = register(&app, "ursula").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/orders",
        Some(&token),
        Some(json!({ "items": [] }).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "An order needs at least one item." }));
}

#[tokio::test]
async fn health_and_unknown_routes() {
    let app = app();

    let (status, _) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Not found" }));
}
