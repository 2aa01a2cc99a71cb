use chrono::Utc;
use redis::Script;

use crate::{
    errors::{AppError, pool_error},
    models::{NewReview, Review, redis::RedisKey},
    state::RedisClient,
};

// KEYS: owner marker, review document, product index.
// ARGV: review id, review json, score.
// Every check runs before the first write, so the script either writes all
// three keys or none of them.
const CREATE_REVIEW_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 1 then
    return 0
end
local index_type = redis.call('TYPE', KEYS[3]).ok
if index_type ~= 'none' and index_type ~= 'zset' then
    return redis.error_reply('WRONGTYPE review index ' .. KEYS[3] .. ' is a ' .. index_type)
end
redis.call('SET', KEYS[1], ARGV[1])
redis.call('SET', KEYS[2], ARGV[2])
redis.call('ZADD', KEYS[3], ARGV[3], ARGV[1])
return 1
"#;

/// Persists a review. Claiming the `review_owner` marker, storing the
/// document and indexing it under the product happen in one Lua script, so
/// two racing submissions for the same (user, product) can never both land
/// and a failed insert leaves nothing behind.
pub async fn create_review(new_review: NewReview, redis: RedisClient) -> Result<Review, AppError> {
    let review = new_review.into_review(Utc::now());
    let json = serde_json::to_string(&review).map_err(|e| AppError::Serialization(e.to_string()))?;
    let owner_key = RedisKey::review_owner(&review.product, review.user);

    let mut conn = redis.get().await.map_err(pool_error)?;

    let created: i64 = Script::new(CREATE_REVIEW_SCRIPT)
        .key(&owner_key)
        .key(RedisKey::review(review.id))
        .key(RedisKey::product_reviews(&review.product))
        .arg(review.id.to_string())
        .arg(json)
        .arg(review.created_at.timestamp_millis())
        .invoke_async(&mut *conn)
        .await
        .map_err(|e| {
            tracing::error!("Failed to store review {}: {}", review.id, e);
            AppError::RedisCommandError(e)
        })?;

    if created == 0 {
        return Err(AppError::UniqueViolation(owner_key));
    }

    Ok(review)
}
