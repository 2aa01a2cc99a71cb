use std::{collections::HashMap, sync::Arc};

use uuid::Uuid;

use crate::{
    auth::{Credentials, IdentityProvider},
    db::{OrderStore, ReviewStore, UserStore},
    errors::AppError,
    models::{Author, Review, ReviewPayload, ReviewWithAuthor},
};

/// Gates review submissions on purchase history and keeps one review per
/// (user, product).
#[derive(Clone)]
pub struct ReviewService {
    identity: Arc<dyn IdentityProvider>,
    orders: Arc<dyn OrderStore>,
    reviews: Arc<dyn ReviewStore>,
    users: Arc<dyn UserStore>,
}

impl ReviewService {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        orders: Arc<dyn OrderStore>,
        reviews: Arc<dyn ReviewStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            identity,
            orders,
            reviews,
            users,
        }
    }

    /// Checks run in a fixed order and the first failure wins:
    /// identity, payload, purchase, existing review. Nothing is written
    /// unless all of them pass.
    pub async fn submit_review(
        &self,
        credentials: Option<&Credentials>,
        payload: ReviewPayload,
    ) -> Result<Review, AppError> {
        let user_id = self.identity.resolve_caller(credentials)?;
        let new_review = payload.validate(user_id)?;

        let purchase = self
            .orders
            .find_order_by_user_and_product(user_id, &new_review.product)
            .await
            .map_err(AppError::into_store_failure)?;

        if purchase.is_none() {
            tracing::info!(
                "User {} tried to review unpurchased product {}",
                user_id,
                new_review.product
            );
            return Err(AppError::NotEligible);
        }

        let existing = self
            .reviews
            .find_review(user_id, &new_review.product)
            .await
            .map_err(AppError::into_store_failure)?;

        if existing.is_some() {
            return Err(AppError::AlreadyReviewed);
        }

        match self.reviews.insert_review(new_review).await {
            Ok(review) => {
                tracing::info!(
                    "Review {} created by user {} for product {}",
                    review.id,
                    review.user,
                    review.product
                );
                Ok(review)
            }
            Err(AppError::UniqueViolation(key)) => {
                tracing::warn!("Lost review race on {}", key);
                Err(AppError::AlreadyReviewed)
            }
            Err(e) => Err(e.into_store_failure()),
        }
    }

    pub async fn list_reviews(&self, product_id: &str) -> Result<Vec<ReviewWithAuthor>, AppError> {
        let reviews = self
            .reviews
            .list_reviews(product_id)
            .await
            .map_err(AppError::into_store_failure)?;

        let mut authors: HashMap<Uuid, Option<Author>> = HashMap::new();
        let mut listed = Vec::with_capacity(reviews.len());

        for review in reviews {
            let author = match authors.get(&review.user) {
                Some(author) => author.clone(),
                None => {
                    let author = self
                        .users
                        .find_user(review.user)
                        .await
                        .map_err(AppError::into_store_failure)?
                        .map(Author::from);
                    if author.is_none() {
                        tracing::warn!(
                            "Review {} has no matching author {}",
                            review.id,
                            review.user
                        );
                    }
                    authors.insert(review.user, author.clone());
                    author
                }
            };
            listed.push(ReviewWithAuthor::new(review, author));
        }

        Ok(listed)
    }
}
