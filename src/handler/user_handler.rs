use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::dto::user_dto::{
    LoginRequest, LoginResponse, NewUser, RefreshTokenRequest, RegisterRequest, RegisterResponse, UserResponse,
    UserView,
};
use crate::dto::{require_fields, require_iso_date, validate_payload};
use crate::model::user::Role;
use crate::service::user_service::{UserService, UserServiceImpl};
use crate::util::error::HandlerError;

// Register
pub async fn register_handler(
    State(service): State<Arc<UserServiceImpl>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let Json(payload) = payload?;
    require_fields(&[
        ("username", &payload.username),
        ("password", &payload.password),
        ("id_number", &payload.id_number),
        ("birthdate", &payload.birthdate),
    ])?;
    validate_payload(&payload)?;

    let new_user = NewUser {
        username: payload.username.unwrap_or_default(),
        password: payload.password.unwrap_or_default(),
        id_number: payload.id_number.unwrap_or_default(),
        birthdate: payload.birthdate.unwrap_or_default(),
        role: Role::User,
    };
    require_iso_date("birthdate", &new_user.birthdate)?;

    let user = service.register(new_user).await?;
    let user = UserView::from(user);
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful! Please login.".to_string(),
            user_id: user.user_id.clone(),
            user,
        }),
    ))
}

// Login
pub async fn login_handler(
    State(service): State<Arc<UserServiceImpl>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let Json(payload) = payload?;
    require_fields(&[("username", &payload.username), ("password", &payload.password)])?;

    let authenticated = service
        .login(payload.username.unwrap_or_default(), payload.password.unwrap_or_default())
        .await?;
    info!(username = %authenticated.user.username, "Login succeeded");
    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user: UserView::from(authenticated.user),
        tokens: authenticated.tokens,
    }))
}

// Refresh Token
pub async fn refresh_token_handler(
    State(service): State<Arc<UserServiceImpl>>,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let Json(payload) = payload?;
    require_fields(&[("refresh_token", &payload.refresh_token)])?;
    let tokens = service.refresh_token(payload.refresh_token.unwrap_or_default()).await?;
    Ok(Json(tokens))
}

// Get User
pub async fn get_user_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let user = service.get_user(&user_id).await?;
    Ok(Json(UserResponse { user: UserView::from(user) }))
}
