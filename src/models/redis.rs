use uuid::Uuid;

pub struct RedisKey;

impl RedisKey {
    pub fn user(user_id: Uuid) -> String {
        format!("user:{user_id}")
    }

    pub fn user_email(email: &str) -> String {
        let email = email.to_lowercase();
        format!("user_email:{email}")
    }

    pub fn order(order_id: Uuid) -> String {
        format!("order:{order_id}")
    }

    /// Products a user has bought, mapped to the first order that proves it.
    pub fn user_purchases(user_id: Uuid) -> String {
        format!("user:{user_id}:purchases")
    }

    pub fn review(review_id: Uuid) -> String {
        format!("review:{review_id}")
    }

    /// Unique marker for one review per (user, product).
    pub fn review_owner(product_id: &str, user_id: Uuid) -> String {
        format!("review_owner:{product_id}:{user_id}")
    }

    pub fn product_reviews(product_id: &str) -> String {
        format!("product:{product_id}:reviews")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_keys_are_case_insensitive() {
        assert_eq!(
            RedisKey::user_email("Ada@Example.com"),
            RedisKey::user_email("ada@example.com")
        );
    }

    #[test]
    fn review_owner_key_covers_both_halves_of_the_pair() {
        let user = Uuid::nil();
        assert_eq!(
            RedisKey::review_owner("p-1", user),
            format!("review_owner:p-1:{user}")
        );
    }
}
