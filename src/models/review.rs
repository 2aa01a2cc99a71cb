use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors::AppError, models::user::Author};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;
pub const MAX_COMMENT_CHARS: usize = 2000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub user: Uuid,
    pub product: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// A validated submission, ready for the admission checks.
/// `created_at` is left to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub user: Uuid,
    pub product: String,
    pub rating: u8,
    pub comment: String,
}

impl NewReview {
    pub fn into_review(self, created_at: DateTime<Utc>) -> Review {
        Review {
            id: Uuid::new_v4(),
            user: self.user,
            product: self.product,
            rating: self.rating,
            comment: self.comment,
            created_at,
        }
    }
}

/// Review submission as it arrives on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPayload {
    pub product_id: String,
    pub rating: f64,
    #[serde(default)]
    pub comment: String,
}

impl ReviewPayload {
    pub fn validate(self, user: Uuid) -> Result<NewReview, AppError> {
        let product = self.product_id.trim();
        if product.is_empty() {
            return Err(AppError::Validation("Product id is required.".into()));
        }

        let rating = self.rating;
        if rating.fract() != 0.0
            || rating < f64::from(MIN_RATING)
            || rating > f64::from(MAX_RATING)
        {
            return Err(AppError::Validation(format!(
                "Rating must be a whole number between {MIN_RATING} and {MAX_RATING}."
            )));
        }

        let comment = self.comment.trim();
        if comment.chars().count() > MAX_COMMENT_CHARS {
            return Err(AppError::Validation(format!(
                "Comment must be at most {MAX_COMMENT_CHARS} characters."
            )));
        }

        Ok(NewReview {
            user,
            product: product.to_string(),
            rating: rating as u8,
            comment: comment.to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWithAuthor {
    pub id: Uuid,
    pub user: Option<Author>,
    pub product: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl ReviewWithAuthor {
    pub fn new(review: Review, author: Option<Author>) -> Self {
        Self {
            id: review.id,
            user: author,
            product: review.product,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
        }
    }
}
