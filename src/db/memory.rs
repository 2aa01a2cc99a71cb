use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    db::{OrderStore, ReviewStore, UserStore},
    errors::AppError,
    models::{NewReview, Order, Review, User},
};

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    emails: HashMap<String, Uuid>,
    orders: Vec<Order>,
    reviews: Vec<Review>,
}

/// Process-local backend used for development (`STORE_BACKEND=memory`) and
/// tests. Every operation runs under a single lock, which is what makes the
/// review uniqueness check atomic.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn review_count(&self) -> usize {
        self.state.lock().await.reviews.len()
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn find_order_by_user_and_product(
        &self,
        user_id: Uuid,
        product_id: &str,
    ) -> Result<Option<Order>, AppError> {
        let state = self.state.lock().await;
        Ok(state
            .orders
            .iter()
            .find(|order| order.user == user_id && order.contains_product(product_id))
            .cloned())
    }

    async fn insert_order(&self, order: Order) -> Result<Order, AppError> {
        self.state.lock().await.orders.push(order.clone());
        Ok(order)
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn find_review(
        &self,
        user_id: Uuid,
        product_id: &str,
    ) -> Result<Option<Review>, AppError> {
        let state = self.state.lock().await;
        Ok(state
            .reviews
            .iter()
            .find(|review| review.user == user_id && review.product == product_id)
            .cloned())
    }

    async fn insert_review(&self, new_review: NewReview) -> Result<Review, AppError> {
        let mut state = self.state.lock().await;

        let taken = state
            .reviews
            .iter()
            .any(|review| review.user == new_review.user && review.product == new_review.product);
        if taken {
            return Err(AppError::UniqueViolation(format!(
                "review_owner:{}:{}",
                new_review.product, new_review.user
            )));
        }

        let review = new_review.into_review(Utc::now());
        state.reviews.push(review.clone());
        Ok(review)
    }

    async fn list_reviews(&self, product_id: &str) -> Result<Vec<Review>, AppError> {
        let state = self.state.lock().await;
        // Walk newest-inserted first so equal timestamps keep insertion order reversed.
        let mut reviews: Vec<Review> = state
            .reviews
            .iter()
            .rev()
            .filter(|review| review.product == product_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.state.lock().await.users.get(&user_id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let state = self.state.lock().await;
        Ok(state
            .emails
            .get(&email.to_lowercase())
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn insert_user(&self, user: User) -> Result<User, AppError> {
        let mut state = self.state.lock().await;
        let email = user.email.to_lowercase();
        if state.emails.contains_key(&email) {
            return Err(AppError::UniqueViolation(format!("user_email:{email}")));
        }
        state.emails.insert(email, user.id);
        state.users.insert(user.id, user.clone());
        Ok(user)
    }
}
