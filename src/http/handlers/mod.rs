pub mod order;
pub mod review;
pub mod user;

pub use order::create_order_handler;
pub use review::{create_review_handler, get_product_reviews_handler};
pub use user::create_user_handler;
