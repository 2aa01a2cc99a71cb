use crate::{
    errors::{AppError, pool_error},
    models::{Order, redis::RedisKey},
    state::RedisClient,
};

pub async fn create_order(order: Order, redis: RedisClient) -> Result<Order, AppError> {
    let mut conn = redis.get().await.map_err(pool_error)?;

    let json = serde_json::to_string(&order).map_err(|e| AppError::Serialization(e.to_string()))?;
    let purchases_key = RedisKey::user_purchases(order.user);

    let mut pipe = redis::pipe();
    pipe.atomic().set(RedisKey::order(order.id), json).ignore();
    for item in &order.items {
        // First order wins; later orders for the same product add nothing new.
        pipe.hset_nx(&purchases_key, &item.product_id, order.id.to_string())
            .ignore();
    }

    let _: () = pipe
        .query_async(&mut *conn)
        .await
        .map_err(AppError::RedisCommandError)?;

    Ok(order)
}
