use crate::{
    errors::{AppError, pool_error},
    models::{User, redis::RedisKey},
    state::RedisClient,
};
use redis::AsyncCommands;
use uuid::Uuid;

pub async fn get_user_by_id(user_id: Uuid, redis: RedisClient) -> Result<Option<User>, AppError> {
    let mut conn = redis.get().await.map_err(pool_error)?;

    let user_json: Option<String> = conn
        .get(RedisKey::user(user_id))
        .await
        .map_err(AppError::RedisCommandError)?;

    user_json
        .map(|json| {
            serde_json::from_str::<User>(&json).map_err(|e| AppError::Serialization(e.to_string()))
        })
        .transpose()
}

pub async fn get_user_by_email(email: &str, redis: RedisClient) -> Result<Option<User>, AppError> {
    let mut conn = redis.get().await.map_err(pool_error)?;

    let user_id: Option<String> = conn
        .get(RedisKey::user_email(email))
        .await
        .map_err(AppError::RedisCommandError)?;

    let Some(user_id) = user_id else {
        tracing::debug!("No user found for email: {}", email);
        return Ok(None);
    };

    let user_id = Uuid::parse_str(&user_id)
        .map_err(|e| AppError::Serialization(format!("Invalid UUID from email lookup: {}", e)))?;

    drop(conn);
    get_user_by_id(user_id, redis).await
}
