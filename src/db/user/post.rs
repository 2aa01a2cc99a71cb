use redis::Script;

use crate::{
    errors::{AppError, pool_error},
    models::{User, redis::RedisKey},
    state::RedisClient,
};

// KEYS: email marker, user document. ARGV: user id, user json.
const CREATE_USER_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 1 then
    return 0
end
redis.call('SET', KEYS[1], ARGV[1])
redis.call('SET', KEYS[2], ARGV[2])
return 1
"#;

/// Claims the email and stores the user in one atomic step.
pub async fn create_user(user: User, redis: RedisClient) -> Result<User, AppError> {
    let json = serde_json::to_string(&user).map_err(|e| AppError::Serialization(e.to_string()))?;
    let email_key = RedisKey::user_email(&user.email);

    let mut conn = redis.get().await.map_err(pool_error)?;

    let created: i64 = Script::new(CREATE_USER_SCRIPT)
        .key(&email_key)
        .key(RedisKey::user(user.id))
        .arg(user.id.to_string())
        .arg(json)
        .invoke_async(&mut *conn)
        .await
        .map_err(|e| {
            tracing::error!("Failed to store user {}: {}", user.id, e);
            AppError::RedisCommandError(e)
        })?;

    if created == 0 {
        return Err(AppError::UniqueViolation(email_key));
    }

    Ok(user)
}
