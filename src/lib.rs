pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod http;
mod middleware;
pub mod models;
pub mod services;
pub mod state;

use axum::{
    Router, error_handling::HandleErrorLayer, http::StatusCode, middleware as axum_middleware,
};
use bb8::Pool;
use bb8_redis::RedisConnectionManager;
use middleware::{cors_layer, create_rate_limiter, handle_middleware_error, rate_limit_middleware};
use std::{net::SocketAddr, num::NonZeroU32, time::Duration};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::{
    auth::JwtAuth,
    config::{Config, StoreBackend},
    db::{MemoryStore, RedisStore},
    errors::{AppError, error_response},
    state::AppState,
};

/// Builds the full router: routes plus rate limiting, tracing, load
/// shedding, timeouts and CORS.
pub fn build_app(state: AppState, config: &Config) -> Router {
    let per_minute = NonZeroU32::new(config.rate_limit_per_minute).unwrap_or(NonZeroU32::MIN);
    let rate_limiter = create_rate_limiter(per_minute);

    Router::new()
        .merge(http::create_http_routes(state))
        .layer(axum_middleware::from_fn(move |req, next| {
            rate_limit_middleware(rate_limiter.clone(), req, next)
        }))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .load_shed()
                .concurrency_limit(config.max_concurrent_requests.max(1))
                .timeout(Duration::from_secs(config.request_timeout_secs)),
        )
        .layer(cors_layer(&config.allowed_origins))
        .fallback(|| async { error_response(StatusCode::NOT_FOUND, "Not found") })
}

pub async fn build_state(config: &Config) -> Result<AppState, AppError> {
    let auth = JwtAuth::new(config.jwt_secret.clone(), config.jwt_ttl_hours);

    match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, data will not survive a restart");
            Ok(AppState::with_store(MemoryStore::new(), auth))
        }
        StoreBackend::Redis => {
            let redis_url = config
                .redis_url
                .clone()
                .ok_or_else(|| AppError::EnvError("REDIS_URL must be set".into()))?;
            let manager = RedisConnectionManager::new(redis_url)?;
            let redis_pool = Pool::builder()
                .connection_timeout(Duration::from_secs(config.request_timeout_secs))
                .build(manager)
                .await?;

            Ok(AppState::with_store(RedisStore::new(redis_pool), auth))
        }
    }
}

pub async fn start_server() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!("Using {} store backend", config.store_backend);

    let state = build_state(&config).await?;
    let app = build_app(state, &config);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!("Storefront reviews server listening on {}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
