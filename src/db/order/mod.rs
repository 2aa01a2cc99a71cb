pub mod get;
pub mod post;

pub use get::get_order_by_user_and_product;
pub use post::create_order;
