use std::{env, fmt::Display, str::FromStr};

use tracing::info;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Redis,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "redis" => Ok(StoreBackend::Redis),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend '{other}'")),
        }
    }
}

impl Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Redis => write!(f, "redis"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub store_backend: StoreBackend,
    pub redis_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub allowed_origins: Vec<String>,
    pub rate_limit_per_minute: u32,
    pub request_timeout_secs: u64,
    pub max_concurrent_requests: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let store_backend: StoreBackend = try_load("STORE_BACKEND", "redis")?;
        let redis_url = match store_backend {
            StoreBackend::Redis => Some(required("REDIS_URL")?),
            StoreBackend::Memory => env::var("REDIS_URL").ok(),
        };

        let rate_limit_per_minute: u32 = try_load("RATE_LIMIT_PER_MINUTE", "1000")?;
        if rate_limit_per_minute == 0 {
            return Err(AppError::EnvError(
                "RATE_LIMIT_PER_MINUTE must be greater than zero".into(),
            ));
        }

        Ok(Self {
            port: try_load("PORT", "3001")?,
            store_backend,
            redis_url,
            jwt_secret: required("JWT_SECRET")?,
            jwt_ttl_hours: try_load("JWT_TTL_HOURS", "24")?,
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            rate_limit_per_minute,
            request_timeout_secs: try_load("REQUEST_TIMEOUT_SECS", "10")?,
            max_concurrent_requests: try_load("MAX_CONCURRENT_REQUESTS", "1024")?,
        })
    }
}

fn required(key: &str) -> Result<String, AppError> {
    env::var(key).map_err(|_| AppError::EnvError(format!("{key} must be set")))
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, AppError>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse()
        .map_err(|e| AppError::EnvError(format!("Invalid {key} value: {e}")))
}
