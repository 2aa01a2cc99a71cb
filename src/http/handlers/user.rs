use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{AppError, ErrorResponse, error_response},
    models::User,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateUserPayload {
    pub name: String,
    pub email: String,
    pub image: Option<String>,
}

impl CreateUserPayload {
    fn validate(self) -> Result<User, AppError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Name is required.".into()));
        }

        let email = self.email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(AppError::Validation("A valid email is required.".into()));
        }

        Ok(User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email,
            image: self.image.filter(|url| !url.trim().is_empty()),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct TokenIssued {
    pub token: String,
}

/// Registers a user, or signs an existing one back in when the email is
/// already known.
pub async fn create_user_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<TokenIssued>), ErrorResponse> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::warn!("Rejected user payload: {}", rejection.body_text());
        error_response(StatusCode::BAD_REQUEST, "Invalid request body")
    })?;

    let candidate = payload.validate().map_err(|e| e.to_response())?;

    let existing = state
        .users
        .find_user_by_email(&candidate.email)
        .await
        .map_err(|e| {
            tracing::error!("Error looking up user: {}", e);
            e.into_store_failure().to_response()
        })?;

    let (user, status) = match existing {
        Some(user) => (user, StatusCode::OK),
        None => match state.users.insert_user(candidate.clone()).await {
            Ok(user) => {
                tracing::info!("User created: {}", user.id);
                (user, StatusCode::CREATED)
            }
            // Lost a race with a concurrent registration for the same email.
            Err(AppError::UniqueViolation(_)) => {
                let user = state
                    .users
                    .find_user_by_email(&candidate.email)
                    .await
                    .map_err(|e| e.into_store_failure().to_response())?
                    .ok_or_else(|| {
                        AppError::StoreUnavailable("email claimed without a user".into())
                            .to_response()
                    })?;
                (user, StatusCode::OK)
            }
            Err(e) => {
                tracing::error!("Error creating user: {}", e);
                return Err(e.into_store_failure().to_response());
            }
        },
    };

    let token = state.auth.generate_jwt(&user).map_err(|e| {
        tracing::error!("Error issuing token: {}", e);
        e.to_response()
    })?;

    Ok((status, Json(TokenIssued { token })))
}
