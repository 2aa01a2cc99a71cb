use std::sync::Arc;

use bb8::Pool;
use bb8_redis::RedisConnectionManager;

use crate::{
    auth::JwtAuth,
    db::{OrderStore, ReviewStore, UserStore},
    services::ReviewService,
};

#[derive(Clone)]
pub struct AppState {
    pub reviews: ReviewService,
    pub orders: Arc<dyn OrderStore>,
    pub users: Arc<dyn UserStore>,
    pub auth: Arc<JwtAuth>,
}

pub type RedisClient = Pool<RedisConnectionManager>;

impl AppState {
    /// Wires every collaborator to the same backing store.
    pub fn with_store<S>(store: S, auth: JwtAuth) -> Self
    where
        S: OrderStore + ReviewStore + UserStore + 'static,
    {
        let store = Arc::new(store);
        let auth = Arc::new(auth);

        Self {
            reviews: ReviewService::new(auth.clone(), store.clone(), store.clone(), store.clone()),
            orders: store.clone(),
            users: store,
            auth,
        }
    }
}
