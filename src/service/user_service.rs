use tracing::{info, error, warn, instrument};
use std::sync::Arc;
use async_trait::async_trait;

use crate::dto::user_dto::NewUser;
use crate::model::user::User;
use crate::repository::user_repo::UserRepository;
use crate::util::error::ServiceError;
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl, TokenPair};
use crate::util::password::{PasswordUtilsImpl, PasswordUtils};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    pub tokens: TokenPair,
}

#[async_trait]
pub trait UserService: Send + Sync {
    async fn register(&self, new_user: NewUser) -> Result<User, ServiceError>;
    async fn login(&self, username: String, password: String) -> Result<AuthenticatedUser, ServiceError>;
    async fn refresh_token(&self, refresh_token: String) -> Result<TokenPair, ServiceError>;
    async fn get_user(&self, user_id: &str) -> Result<User, ServiceError>;
}

pub struct UserServiceImpl {
    pub user_repo: Arc<dyn UserRepository>,
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
}

impl UserServiceImpl {
    pub fn new(user_repo: Arc<dyn UserRepository>, jwt_utils: Arc<JwtTokenUtilsImpl>) -> Self {
        Self { user_repo, jwt_utils }
    }

    fn issue_tokens(&self, user: &User) -> Result<TokenPair, ServiceError> {
        self.jwt_utils
            .generate_token_pair(&user.id_hex(), &user.username, user.role.as_str())
            .map_err(|e| ServiceError::InternalError(format!("JWT error: {}", e)))
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    #[instrument(skip(self, new_user), fields(username = %new_user.username, role = %new_user.role.as_str()))]
    async fn register(&self, new_user: NewUser) -> Result<User, ServiceError> {
        info!("Registering new user");
        PasswordUtilsImpl::validate_password_strength(&new_user.password)
            .map_err(|errors| ServiceError::InvalidInput(errors.join("; ")))?;

        let password_hash = PasswordUtilsImpl::hash_password(&new_user.password)
            .map_err(|e| ServiceError::InternalError(e.to_string()))?;

        let user = User {
            id: None,
            username: new_user.username,
            id_number: new_user.id_number,
            birthdate: new_user.birthdate,
            password_hash,
            role: new_user.role,
            created_at: None,
        };

        // Uniqueness is decided by the store on insert, not by a prior lookup.
        let inserted = self.user_repo.insert(user).await;
        match &inserted {
            Ok(user) => info!(user_id = %user.id_hex(), "User registered"),
            Err(e) => warn!("Failed to register user: {e}"),
        }
        Ok(inserted?)
    }

    #[instrument(skip(self, password), fields(username = %username))]
    async fn login(&self, username: String, password: String) -> Result<AuthenticatedUser, ServiceError> {
        let user = match self.user_repo.find_by_username(&username).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!("Login for unknown username");
                return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
            Err(e) => {
                error!("Failed to fetch user for login: {e}");
                return Err(e.into());
            }
        };

        if !PasswordUtilsImpl::verify_password(&password, &user.password_hash) {
            warn!("Invalid password supplied");
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let tokens = self.issue_tokens(&user)?;
        info!("User logged in successfully");
        Ok(AuthenticatedUser { user, tokens })
    }

    #[instrument(skip(self, refresh_token))]
    async fn refresh_token(&self, refresh_token: String) -> Result<TokenPair, ServiceError> {
        let claims = self.jwt_utils.validate_refresh_token(&refresh_token)
            .map_err(|e| ServiceError::Unauthorized(format!("Invalid refresh token: {}", e)))?;

        // The account may have changed since the token was issued.
        let user = self.user_repo.find_by_id(&claims.sub).await?
            .ok_or_else(|| ServiceError::Unauthorized("User no longer exists".to_string()))?;

        let tokens = self.issue_tokens(&user)?;
        info!(user_id = %claims.sub, "Token refreshed successfully");
        Ok(tokens)
    }

    #[instrument(skip(self))]
    async fn get_user(&self, user_id: &str) -> Result<User, ServiceError> {
        match self.user_repo.find_by_id(user_id).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(ServiceError::NotFound("User not found".to_string())),
            Err(e) => {
                error!("Failed to fetch user: {e}");
                Err(e.into())
            }
        }
    }
}
