use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Serialize;
use tracing::Level;

use crate::{
    auth::{IdentityProvider, MaybeCredentials},
    errors::{ErrorResponse, error_response},
    models::{Review, ReviewPayload, ReviewWithAuthor},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct ReviewCreated {
    pub review: Review,
}

#[derive(Debug, Serialize)]
pub struct ProductReviews {
    pub reviews: Vec<ReviewWithAuthor>,
}

#[axum::debug_handler]
pub async fn create_review_handler(
    State(state): State<AppState>,
    MaybeCredentials(credentials): MaybeCredentials,
    payload: Result<Json<ReviewPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<ReviewCreated>), ErrorResponse> {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            // An anonymous caller learns nothing beyond "Not authenticated".
            state
                .auth
                .resolve_caller(credentials.as_ref())
                .map_err(|e| e.to_response())?;
            tracing::warn!("Rejected review payload: {}", rejection.body_text());
            return Err(error_response(StatusCode::BAD_REQUEST, "Invalid request body"));
        }
    };

    let review = state
        .reviews
        .submit_review(credentials.as_ref(), payload)
        .await
        .map_err(|e| {
            let level = e.log_level();
            if level == Level::ERROR {
                tracing::error!("Error creating review: {}", e);
            } else if level == Level::WARN {
                tracing::warn!("Review submission rejected: {}", e);
            } else {
                tracing::info!("Review submission refused: {}", e);
            }
            e.to_response()
        })?;

    Ok((StatusCode::CREATED, Json(ReviewCreated { review })))
}

pub async fn get_product_reviews_handler(
    Path(product_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ProductReviews>, ErrorResponse> {
    let reviews = state.reviews.list_reviews(&product_id).await.map_err(|e| {
        tracing::error!("Error fetching reviews for {}: {}", product_id, e);
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch reviews")
    })?;

    tracing::info!("Retrieved {} reviews for product {}", reviews.len(), product_id);
    Ok(Json(ProductReviews { reviews }))
}
