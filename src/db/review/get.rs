use crate::{
    errors::{AppError, pool_error},
    models::{Review, redis::RedisKey},
    state::RedisClient,
};
use redis::AsyncCommands;
use uuid::Uuid;

pub async fn get_review(
    user_id: Uuid,
    product_id: &str,
    redis: RedisClient,
) -> Result<Option<Review>, AppError> {
    let mut conn = redis.get().await.map_err(pool_error)?;

    let review_id: Option<String> = conn
        .get(RedisKey::review_owner(product_id, user_id))
        .await
        .map_err(AppError::RedisCommandError)?;

    let Some(review_id) = review_id else {
        return Ok(None);
    };

    let review_id = Uuid::parse_str(&review_id)
        .map_err(|e| AppError::Serialization(format!("Invalid review id: {}", e)))?;

    let review_json: Option<String> = conn
        .get(RedisKey::review(review_id))
        .await
        .map_err(AppError::RedisCommandError)?;

    match review_json {
        Some(json) => serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| AppError::Serialization(e.to_string())),
        // Marker and document are written by one script, so this is corruption.
        None => Err(AppError::Serialization(format!(
            "review_owner marker for {} by {} points at missing review {}",
            product_id, user_id, review_id
        ))),
    }
}

/// Newest first.
pub async fn get_reviews_by_product(
    product_id: &str,
    redis: RedisClient,
) -> Result<Vec<Review>, AppError> {
    let mut conn = redis.get().await.map_err(pool_error)?;

    let review_ids: Vec<String> = conn
        .zrevrange(RedisKey::product_reviews(product_id), 0, -1)
        .await
        .map_err(AppError::RedisCommandError)?;

    if review_ids.is_empty() {
        return Ok(Vec::new());
    }

    let keys = review_ids
        .iter()
        .map(|id| {
            Uuid::parse_str(id)
                .map(RedisKey::review)
                .map_err(|e| AppError::Serialization(format!("Invalid review id: {}", e)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let payloads: Vec<Option<String>> = redis::cmd("MGET")
        .arg(&keys)
        .query_async(&mut *conn)
        .await
        .map_err(AppError::RedisCommandError)?;

    let mut reviews = Vec::with_capacity(payloads.len());
    for (key, json) in keys.iter().zip(payloads) {
        let Some(json) = json else {
            tracing::warn!("Review index for {} references missing {}", product_id, key);
            continue;
        };
        let review: Review =
            serde_json::from_str(&json).map_err(|e| AppError::Serialization(e.to_string()))?;
        reviews.push(review);
    }

    Ok(reviews)
}
