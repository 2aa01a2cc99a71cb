use axum::{
    BoxError, Json,
    extract::{ConnectInfo, Request},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{Quota, RateLimiter, clock::DefaultClock, state::keyed::DefaultKeyedStateStore};
use std::{net::SocketAddr, num::NonZeroU32, sync::Arc, time::Duration};
use tower::{load_shed::error::Overloaded, timeout::error::Elapsed};
use tower_http::cors::CorsLayer;

use crate::errors::{ErrorBody, ErrorResponse, error_response};

pub type IpRateLimiter = Arc<RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>>;

pub fn create_rate_limiter(per_minute: NonZeroU32) -> IpRateLimiter {
    Arc::new(RateLimiter::keyed(Quota::per_minute(per_minute)))
}

// IP-based rate limiting middleware function
pub async fn rate_limit_middleware(
    rate_limiter: IpRateLimiter,
    request: Request,
    next: Next,
) -> Response {
    let client_ip =
        if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
            addr.ip().to_string()
        } else {
            "unknown".to_string()
        };

    match rate_limiter.check_key(&client_ip) {
        Ok(_) => next.run(request).await,
        Err(_) => {
            tracing::warn!("Rate limit exceeded for IP: {}", client_ip);
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(ErrorBody {
                    error: "Too many requests".into(),
                }),
            )
                .into_response()
        }
    }
}

/// Maps failures raised by the tower timeout and load-shed layers.
pub async fn handle_middleware_error(err: BoxError) -> ErrorResponse {
    if err.is::<Elapsed>() {
        tracing::warn!("Request timed out");
        error_response(StatusCode::REQUEST_TIMEOUT, "Request timed out")
    } else if err.is::<Overloaded>() {
        tracing::warn!("Shedding load");
        error_response(StatusCode::SERVICE_UNAVAILABLE, "Service overloaded")
    } else {
        tracing::error!("Unhandled middleware error: {}", err);
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong")
    }
}

pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allowed_origins = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin {}: {}", origin, e);
                None
            }
        })
        .collect::<Vec<_>>();

    tracing::info!("CORS allowed origins: {:?}", allowed_origins);

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
