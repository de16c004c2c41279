use axum::{body::Body, extract::State, http::{header::AUTHORIZATION, Request}, middleware::Next, response::Response};
use std::sync::Arc;
use tracing::warn;

use crate::model::user::Role;
use crate::util::error::HandlerError;
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};

pub struct AdminAuthState {
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
}

/// Admits only requests carrying a valid admin access token and attaches
/// the token claims to the request as the principal.
pub async fn admin_auth(
    State(state): State<Arc<AdminAuthState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, HandlerError> {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| HandlerError::unauthorized("Authentication required"))?;

    let token = state
        .jwt_utils
        .extract_token_from_header(auth_header)
        .map_err(|e| HandlerError::unauthorized("Invalid authorization header").with_details(e.to_string()))?;

    let claims = state
        .jwt_utils
        .validate_access_token(&token)
        .map_err(|e| HandlerError::unauthorized("Invalid or expired session").with_details(e.to_string()))?;

    if !state.jwt_utils.check_role_permission(&claims.role, Role::Admin.as_str()) {
        warn!(user_id = %claims.sub, role = %claims.role, "Non-admin principal rejected");
        return Err(HandlerError::unauthorized("Admin privileges required"));
    }

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
