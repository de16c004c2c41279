use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation, Algorithm};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use crate::config::JwtConfig;

/// Session token claims; `sub` is the user's store identifier
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    /// "user" or "admin"
    pub role: String,
    pub iat: i64,
    pub exp: i64,
    /// "access" or "refresh"
    pub token_type: String,
    pub jti: String,
}

/// Token pair returned on login and refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

#[derive(Debug, Clone, Copy)]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// Error types for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Failed to encode JWT token: {0}")]
    EncodingFailed(String),
    #[error("Failed to decode JWT token: {0}")]
    DecodingFailed(String),
    #[error("Token has expired")]
    TokenExpired,
    #[error("Invalid token format")]
    InvalidToken,
    #[error("Invalid token type: expected {expected}, got {actual}")]
    InvalidTokenType { expected: String, actual: String },
}

pub trait JwtTokenUtils {
    fn generate_access_token(&self, user_id: &str, username: &str, role: &str) -> Result<String, JwtError>;
    fn generate_refresh_token(&self, user_id: &str, username: &str, role: &str) -> Result<String, JwtError>;
    fn generate_token_pair(&self, user_id: &str, username: &str, role: &str) -> Result<TokenPair, JwtError>;
    fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError>;
    fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError>;
    fn extract_token_from_header(&self, auth_header: &str) -> Result<String, JwtError>;
    fn check_role_permission(&self, user_role: &str, required_role: &str) -> bool;
}

#[derive(Debug, Clone)]
pub struct JwtTokenUtilsImpl {
    pub jwt_config: JwtConfig,
}

impl JwtTokenUtilsImpl {

    pub fn new(jwt_config: JwtConfig) -> Self {
        JwtTokenUtilsImpl {
            jwt_config,
        }
    }

    fn generate_token(&self, user_id: &str, username: &str, role: &str, token_type: TokenType, expires_in_minutes: i64) -> Result<String, JwtError> {
        debug!(
            "Generating {} token for user: {} with role: {}",
            token_type.as_str(),
            user_id,
            role
        );

        let now = Utc::now();
        let expiration = now + Duration::minutes(expires_in_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            token_type: token_type.as_str().to_string(),
            jti: Uuid::new_v4().to_string(),
        };

        let encoding_key = EncodingKey::from_secret(self.jwt_config.jwt_secret.as_bytes());

        encode(&Header::new(Algorithm::HS256), &claims, &encoding_key).map_err(|err| {
            error!("Failed to encode JWT token: {}", err);
            JwtError::EncodingFailed(err.to_string())
        })
    }

    pub fn validate_token(&self, token: &str, expected_token_type: Option<TokenType>) -> Result<Claims, JwtError> {
        let decoding_key = DecodingKey::from_secret(self.jwt_config.jwt_secret.as_bytes());
        let validation = Validation::new(Algorithm::HS256);

        let claims = match decode::<Claims>(token, &decoding_key, &validation) {
            Ok(token_data) => token_data.claims,
            Err(err) => {
                return match err.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        warn!("Rejected expired token");
                        Err(JwtError::TokenExpired)
                    }
                    _ => {
                        warn!("Failed to decode JWT token: {}", err);
                        Err(JwtError::DecodingFailed(err.to_string()))
                    }
                };
            }
        };

        if let Some(expected_type) = expected_token_type {
            if claims.token_type != expected_type.as_str() {
                warn!(
                    "Invalid token type: expected {}, got {}",
                    expected_type.as_str(),
                    claims.token_type
                );
                return Err(JwtError::InvalidTokenType {
                    expected: expected_type.as_str().to_string(),
                    actual: claims.token_type,
                });
            }
        }

        debug!("Token validation successful for user: {}", claims.sub);
        Ok(claims)
    }

}

impl JwtTokenUtils for JwtTokenUtilsImpl {

    fn generate_access_token(&self, user_id: &str, username: &str, role: &str) -> Result<String, JwtError> {
        self.generate_token(user_id, username, role, TokenType::Access, self.jwt_config.access_token_expiration)
    }

    fn generate_refresh_token(&self, user_id: &str, username: &str, role: &str) -> Result<String, JwtError> {
        self.generate_token(user_id, username, role, TokenType::Refresh, self.jwt_config.refresh_token_expiration)
    }

    fn generate_token_pair(&self, user_id: &str, username: &str, role: &str) -> Result<TokenPair, JwtError> {
        let access_token = self.generate_access_token(user_id, username, role)?;
        let refresh_token = self.generate_refresh_token(user_id, username, role)?;

        info!("Issued token pair for user: {}", user_id);
        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.jwt_config.access_token_expiration * 60, // minutes to seconds
            token_type: "Bearer".to_string(),
        })
    }

    fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate_token(token, Some(TokenType::Access))
    }

    fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate_token(token, Some(TokenType::Refresh))
    }

    fn extract_token_from_header(&self, auth_header: &str) -> Result<String, JwtError> {
        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or(JwtError::InvalidToken)?;

        if token.is_empty() {
            warn!("Empty token in authorization header");
            return Err(JwtError::InvalidToken);
        }

        Ok(token.to_string())
    }

    fn check_role_permission(&self, user_role: &str, required_role: &str) -> bool {
        match (user_role, required_role) {
            // Admin has access to everything
            ("admin", _) => true,
            ("user", "user") => true,
            _ => false,
        }
    }

}
