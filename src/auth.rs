use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::TypedHeader;
use chrono::{Duration, Utc};
use headers::{Authorization, authorization::Bearer};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{User, user::Claims},
};

/// Raw credential presented by the caller. Only an `IdentityProvider` can
/// turn it into a user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials(pub String);

/// Bearer token from the `Authorization` header, if any. Never rejects:
/// a missing or malformed header is left for the identity check to report.
pub struct MaybeCredentials(pub Option<Credentials>);

impl<S> FromRequestParts<S> for MaybeCredentials
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let credentials = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .ok()
            .map(|TypedHeader(Authorization(bearer))| Credentials(bearer.token().to_string()));

        Ok(Self(credentials))
    }
}

pub trait IdentityProvider: Send + Sync {
    fn resolve(&self, credentials: &Credentials) -> Result<Uuid, AppError>;

    fn resolve_caller(&self, credentials: Option<&Credentials>) -> Result<Uuid, AppError> {
        let credentials = credentials.ok_or(AppError::Unauthenticated)?;
        self.resolve(credentials)
    }
}

#[derive(Clone)]
pub struct JwtAuth {
    secret: String,
    ttl_hours: i64,
}

impl JwtAuth {
    pub fn new(secret: impl Into<String>, ttl_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_hours,
        }
    }

    pub fn generate_jwt(&self, user: &User) -> Result<String, AppError> {
        let expiration = (Utc::now() + Duration::hours(self.ttl_hours)).timestamp() as usize;
        let claims = Claims {
            sub: user.id.to_string(),
            exp: expiration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(AppError::JwtError)
    }
}

impl IdentityProvider for JwtAuth {
    fn resolve(&self, credentials: &Credentials) -> Result<Uuid, AppError> {
        let token_data = decode::<Claims>(
            &credentials.0,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| {
            tracing::warn!("Rejected bearer token: {}", e);
            AppError::Unauthenticated
        })?;

        Uuid::parse_str(&token_data.claims.sub).map_err(|_| {
            tracing::warn!("Token subject is not a user id");
            AppError::Unauthenticated
        })
    }
}
