pub mod memory;
pub mod order;
pub mod review;
pub mod user;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{NewReview, Order, Review, User},
    state::RedisClient,
};

pub use memory::MemoryStore;

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn find_order_by_user_and_product(
        &self,
        user_id: Uuid,
        product_id: &str,
    ) -> Result<Option<Order>, AppError>;

    async fn insert_order(&self, order: Order) -> Result<Order, AppError>;
}

/// Review persistence. `insert_review` must reject a second review for the
/// same (user, product) with `AppError::UniqueViolation`, atomically.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn find_review(&self, user_id: Uuid, product_id: &str)
    -> Result<Option<Review>, AppError>;

    async fn insert_review(&self, review: NewReview) -> Result<Review, AppError>;

    /// All reviews for a product, newest first.
    async fn list_reviews(&self, product_id: &str) -> Result<Vec<Review>, AppError>;
}

/// Emails are unique; `insert_user` fails with `AppError::UniqueViolation`
/// when one is already taken.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn insert_user(&self, user: User) -> Result<User, AppError>;
}

#[derive(Clone)]
pub struct RedisStore {
    redis: RedisClient,
}

impl RedisStore {
    pub fn new(redis: RedisClient) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl OrderStore for RedisStore {
    async fn find_order_by_user_and_product(
        &self,
        user_id: Uuid,
        product_id: &str,
    ) -> Result<Option<Order>, AppError> {
        order::get_order_by_user_and_product(user_id, product_id, self.redis.clone()).await
    }

    async fn insert_order(&self, order: Order) -> Result<Order, AppError> {
        order::create_order(order, self.redis.clone()).await
    }
}

#[async_trait]
impl ReviewStore for RedisStore {
    async fn find_review(
        &self,
        user_id: Uuid,
        product_id: &str,
    ) -> Result<Option<Review>, AppError> {
        review::get_review(user_id, product_id, self.redis.clone()).await
    }

    async fn insert_review(&self, new_review: NewReview) -> Result<Review, AppError> {
        review::create_review(new_review, self.redis.clone()).await
    }

    async fn list_reviews(&self, product_id: &str) -> Result<Vec<Review>, AppError> {
        review::get_reviews_by_product(product_id, self.redis.clone()).await
    }
}

#[async_trait]
impl UserStore for RedisStore {
    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        user::get_user_by_id(user_id, self.redis.clone()).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        user::get_user_by_email(email, self.redis.clone()).await
    }

    async fn insert_user(&self, new_user: User) -> Result<User, AppError> {
        user::create_user(new_user, self.redis.clone()).await
    }
}
