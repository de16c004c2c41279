use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::repository::mongo_store::StoreHealth;

pub async fn index_handler() -> impl IntoResponse {
    Json(json!({
        "message": "TUPT Counseling Scheduler API",
        "status": "active"
    }))
}

pub async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "message": "API is running"
    }))
}

// Database connectivity check
pub async fn test_db_handler(State(store): State<Arc<dyn StoreHealth>>) -> impl IntoResponse {
    match store.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "connected" }))),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "status": "disconnected", "error": e.to_string() })),
        ),
    }
}
