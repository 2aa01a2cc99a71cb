use axum::{
    Router,
    routing::{get, post},
};

use crate::{
    http::handlers::{
        create_order_handler, create_review_handler, create_user_handler,
        get_product_reviews_handler,
    },
    state::AppState,
};

pub fn create_http_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/users", post(create_user_handler))
        .route("/api/orders", post(create_order_handler))
        .route("/api/reviews", post(create_review_handler))
        .route("/api/reviews/{product_id}", get(get_product_reviews_handler))
        .with_state(state)
}
