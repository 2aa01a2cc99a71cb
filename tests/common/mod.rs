#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use storefront_reviews_be::{
    auth::{Credentials, JwtAuth},
    db::{MemoryStore, OrderStore, ReviewStore, UserStore},
    errors::AppError,
    models::{NewReview, Order, OrderItem, Review, ReviewPayload, User},
    services::ReviewService,
};
use tokio::sync::Barrier;
use uuid::Uuid;

pub const SECRET: &str = "test-secret";

pub fn auth() -> JwtAuth {
    JwtAuth::new(SECRET, 1)
}

pub fn user(name: &str) -> User {
    User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        image: Some(format!("https://cdn.example.com/{}.png", name.to_lowercase())),
    }
}

pub fn credentials_for(user: &User) -> Credentials {
    Credentials(auth().generate_jwt(user).unwrap())
}

pub fn order_for(user: &User, products: &[&str]) -> Order {
    Order::new(
        user.id,
        products
            .iter()
            .map(|p| OrderItem {
                product_id: p.to_string(),
                quantity: 1,
            })
            .collect(),
    )
}

pub fn payload(product_id: &str, rating: f64, comment: &str) -> ReviewPayload {
    ReviewPayload {
        product_id: product_id.to_string(),
        rating,
        comment: comment.to_string(),
    }
}

pub fn service_over(store: &MemoryStore) -> ReviewService {
    let store = Arc::new(store.clone());
    ReviewService::new(Arc::new(auth()), store.clone(), store.clone(), store)
}

pub async fn reviews_for(store: &MemoryStore, user: &User, product: &str) -> Vec<Review> {
    store
        .list_reviews(product)
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.user == user.id)
        .collect()
}

/// Wraps a store and counts every call made through it.
#[derive(Clone, Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    pub calls: Arc<AtomicUsize>,
}

impl CountingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    pub fn service(&self) -> ReviewService {
        let store = Arc::new(self.clone());
        ReviewService::new(Arc::new(auth()), store.clone(), store.clone(), store)
    }
}

#[async_trait]
impl OrderStore for CountingStore {
    async fn find_order_by_user_and_product(
        &self,
        user_id: Uuid,
        product_id: &str,
    ) -> Result<Option<Order>, AppError> {
        self.hit();
        self.inner
            .find_order_by_user_and_product(user_id, product_id)
            .await
    }

    async fn insert_order(&self, order: Order) -> Result<Order, AppError> {
        self.hit();
        self.inner.insert_order(order).await
    }
}

#[async_trait]
impl ReviewStore for CountingStore {
    async fn find_review(
        &self,
        user_id: Uuid,
        product_id: &str,
    ) -> Result<Option<Review>, AppError> {
        self.hit();
        self.inner.find_review(user_id, product_id).await
    }

    async fn insert_review(&self, review: NewReview) -> Result<Review, AppError> {
        self.hit();
        self.inner.insert_review(review).await
    }

    async fn list_reviews(&self, product_id: &str) -> Result<Vec<Review>, AppError> {
        self.hit();
        self.inner.list_reviews(product_id).await
    }
}

#[async_trait]
impl UserStore for CountingStore {
    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        self.hit();
        self.inner.find_user(user_id).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.hit();
        self.inner.find_user_by_email(email).await
    }

    async fn insert_user(&self, user: User) -> Result<User, AppError> {
        self.hit();
        self.inner.insert_user(user).await
    }
}

/// Holds every `find_review` caller at a barrier so that concurrent
/// submissions all pass the duplicate check before any of them inserts.
pub struct RacingReviews {
    pub inner: MemoryStore,
    pub barrier: Arc<Barrier>,
}

#[async_trait]
impl ReviewStore for RacingReviews {
    async fn find_review(
        &self,
        user_id: Uuid,
        product_id: &str,
    ) -> Result<Option<Review>, AppError> {
        let found = self.inner.find_review(user_id, product_id).await;
        self.barrier.wait().await;
        found
    }

    async fn insert_review(&self, review: NewReview) -> Result<Review, AppError> {
        self.inner.insert_review(review).await
    }

    async fn list_reviews(&self, product_id: &str) -> Result<Vec<Review>, AppError> {
        self.inner.list_reviews(product_id).await
    }
}

/// Order store whose every call fails like a dropped connection.
pub struct UnreachableOrders;

#[async_trait]
impl OrderStore for UnreachableOrders {
    async fn find_order_by_user_and_product(
        &self,
        _user_id: Uuid,
        _product_id: &str,
    ) -> Result<Option<Order>, AppError> {
        Err(AppError::RedisPoolError("Redis connection timed out".into()))
    }

    async fn insert_order(&self, _order: Order) -> Result<Order, AppError> {
        Err(AppError::RedisPoolError("Redis connection timed out".into()))
    }
}

/// Review store that reads fine but cannot write.
pub struct ReadOnlyReviews {
    pub inner: MemoryStore,
}

#[async_trait]
impl ReviewStore for ReadOnlyReviews {
    async fn find_review(
        &self,
        user_id: Uuid,
        product_id: &str,
    ) -> Result<Option<Review>, AppError> {
        self.inner.find_review(user_id, product_id).await
    }

    async fn insert_review(&self, _review: NewReview) -> Result<Review, AppError> {
        Err(AppError::Serialization("write rejected".into()))
    }

    async fn list_reviews(&self, product_id: &str) -> Result<Vec<Review>, AppError> {
        self.inner.list_reviews(product_id).await
    }
}
