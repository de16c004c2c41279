use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::user::{Role, User};
use crate::util::jwt::TokenPair;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(max = 80))]
    pub username: Option<String>,
    pub password: Option<String>,
    #[validate(length(max = 32))]
    pub id_number: Option<String>,
    pub birthdate: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: Option<String>,
}

/// Registration input after presence checks.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub id_number: String,
    pub birthdate: String,
    pub role: Role,
}

/// Public projection of a user; never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserView {
    pub user_id: String,
    pub username: String,
    pub id_number: String,
    pub birthdate: String,
    pub role: Role,
    pub created_at: Option<String>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        UserView {
            user_id: user.id_hex(),
            username: user.username,
            id_number: user.id_number,
            birthdate: user.birthdate,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: String,
    pub user: UserView,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: UserView,
    pub tokens: TokenPair,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: UserView,
}
