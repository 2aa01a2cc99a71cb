use axum::{Json, http::StatusCode};
use redis::RedisError;
use serde::Serialize;
use thiserror::Error;
use tracing::Level;

pub const NOT_AUTHENTICATED: &str = "Not authenticated";
pub const NOT_ELIGIBLE: &str = "You can only review products you have purchased.";
pub const ALREADY_REVIEWED: &str = "You have already reviewed this product.";
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Purchase required")]
    NotEligible,

    #[error("Already reviewed")]
    AlreadyReviewed,

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Redis pool error: {0}")]
    RedisPoolError(String),

    #[error("Redis command error: {0}")]
    RedisCommandError(#[from] RedisError),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Env error: {0}")]
    EnvError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub type ErrorResponse = (StatusCode, Json<ErrorBody>);

pub fn error_response(status: StatusCode, message: impl Into<String>) -> ErrorResponse {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

impl AppError {
    /// Collapses infrastructure failures into `StoreUnavailable` so callers
    /// only ever see the domain taxonomy.
    pub fn into_store_failure(self) -> AppError {
        match self {
            AppError::RedisPoolError(msg) => AppError::StoreUnavailable(msg),
            AppError::RedisCommandError(e) => AppError::StoreUnavailable(e.to_string()),
            AppError::Serialization(msg) => AppError::StoreUnavailable(msg),
            other => other,
        }
    }

    /// Business-rule refusals are expected traffic; only infrastructure
    /// failures are logged as errors.
    pub fn log_level(&self) -> Level {
        match self {
            AppError::NotEligible | AppError::AlreadyReviewed | AppError::UniqueViolation(_) => {
                Level::INFO
            }
            AppError::Unauthenticated | AppError::Validation(_) => Level::WARN,
            _ => Level::ERROR,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        match self {
            AppError::Unauthenticated => {
                error_response(StatusCode::UNAUTHORIZED, NOT_AUTHENTICATED)
            }
            AppError::NotEligible => error_response(StatusCode::FORBIDDEN, NOT_ELIGIBLE),
            AppError::AlreadyReviewed => error_response(StatusCode::BAD_REQUEST, ALREADY_REVIEWED),
            AppError::UniqueViolation(_) => {
                error_response(StatusCode::CONFLICT, "Resource already exists")
            }
            AppError::Validation(msg) => error_response(StatusCode::BAD_REQUEST, msg.clone()),
            AppError::StoreUnavailable(_)
            | AppError::RedisPoolError(_)
            | AppError::RedisCommandError(_)
            | AppError::Serialization(_)
            | AppError::JwtError(_)
            | AppError::EnvError(_)
            | AppError::Io(_) => {
                error_response(StatusCode::INTERNAL_SERVER_ERROR, SOMETHING_WENT_WRONG)
            }
        }
    }
}

pub fn pool_error(e: bb8::RunError<RedisError>) -> AppError {
    match e {
        bb8::RunError::User(err) => AppError::RedisCommandError(err),
        bb8::RunError::TimedOut => AppError::RedisPoolError("Redis connection timed out".into()),
    }
}
