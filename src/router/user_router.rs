use axum::{Router, routing::{get, post}};
use crate::handler::user_handler::{
    register_handler,
    login_handler,
    refresh_token_handler,
    get_user_handler,
};
use std::sync::Arc;
use crate::service::user_service::UserServiceImpl;

pub fn user_router(service: Arc<UserServiceImpl>) -> Router {
    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .route("/refresh-token", post(refresh_token_handler))
        .route("/user/{user_id}", get(get_user_handler))
        .with_state(service)
}
