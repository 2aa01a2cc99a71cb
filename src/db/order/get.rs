use crate::{
    errors::{AppError, pool_error},
    models::{Order, redis::RedisKey},
    state::RedisClient,
};
use redis::AsyncCommands;
use uuid::Uuid;

pub async fn get_order_by_user_and_product(
    user_id: Uuid,
    product_id: &str,
    redis: RedisClient,
) -> Result<Option<Order>, AppError> {
    let mut conn = redis.get().await.map_err(pool_error)?;

    let order_id: Option<String> = conn
        .hget(RedisKey::user_purchases(user_id), product_id)
        .await
        .map_err(AppError::RedisCommandError)?;

    let Some(order_id) = order_id else {
        return Ok(None);
    };

    let order_id = Uuid::parse_str(&order_id)
        .map_err(|e| AppError::Serialization(format!("Invalid order id in purchases: {}", e)))?;

    let order_json: Option<String> = conn
        .get(RedisKey::order(order_id))
        .await
        .map_err(AppError::RedisCommandError)?;

    let Some(order_json) = order_json else {
        tracing::warn!(
            "Purchase index for user {} points at missing order {}",
            user_id,
            order_id
        );
        return Ok(None);
    };

    let order: Order =
        serde_json::from_str(&order_json).map_err(|e| AppError::Serialization(e.to_string()))?;

    // The index is only a hint, the order itself is the proof.
    Ok(Some(order).filter(|o| o.user == user_id && o.contains_product(product_id)))
}
