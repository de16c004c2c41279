use axum::{Router, routing::get};
use std::sync::Arc;

use crate::handler::health_handler::{health_handler, index_handler, test_db_handler};
use crate::repository::mongo_store::StoreHealth;

pub fn health_router(store: Arc<dyn StoreHealth>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/test-db", get(test_db_handler))
        .with_state(store)
}
