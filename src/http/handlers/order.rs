use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::{
    auth::{IdentityProvider, MaybeCredentials},
    errors::{AppError, ErrorResponse, error_response},
    models::{Order, OrderItem},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateOrderPayload {
    pub items: Vec<OrderItem>,
}

impl CreateOrderPayload {
    fn validate(self) -> Result<Vec<OrderItem>, AppError> {
        if self.items.is_empty() {
            return Err(AppError::Validation("An order needs at least one item.".into()));
        }

        self.items
            .into_iter()
            .map(|item| {
                let product_id = item.product_id.trim().to_string();
                if product_id.is_empty() {
                    return Err(AppError::Validation("Product id is required.".into()));
                }
                if item.quantity == 0 {
                    return Err(AppError::Validation("Quantity must be at least 1.".into()));
                }
                Ok(OrderItem {
                    product_id,
                    quantity: item.quantity,
                })
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct OrderCreated {
    pub order: Order,
}

pub async fn create_order_handler(
    State(state): State<AppState>,
    MaybeCredentials(credentials): MaybeCredentials,
    payload: Result<Json<CreateOrderPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderCreated>), ErrorResponse> {
    let user_id = state
        .auth
        .resolve_caller(credentials.as_ref())
        .map_err(|e| e.to_response())?;

    let Json(payload) = payload.map_err(|rejection| {
        tracing::warn!("Rejected order payload: {}", rejection.body_text());
        error_response(StatusCode::BAD_REQUEST, "Invalid request body")
    })?;

    let items = payload.validate().map_err(|e| e.to_response())?;

    let order = state
        .orders
        .insert_order(Order::new(user_id, items))
        .await
        .map_err(|e| {
            tracing::error!("Error recording order for user {}: {}", user_id, e);
            e.into_store_failure().to_response()
        })?;

    tracing::info!("Order {} recorded for user {}", order.id, user_id);
    Ok((StatusCode::CREATED, Json(OrderCreated { order })))
}
