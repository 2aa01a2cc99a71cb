pub mod order;
pub mod redis;
pub mod review;
pub mod user;

pub use order::{Order, OrderItem};
pub use review::{NewReview, Review, ReviewPayload, ReviewWithAuthor};
pub use user::{Author, User};
