pub mod get;
pub mod post;

pub use get::{get_review, get_reviews_by_product};
pub use post::create_review;
