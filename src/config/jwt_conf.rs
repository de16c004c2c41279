use std::env;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;

const MIN_SECRET_LEN: usize = 32;

/// Signing configuration for session tokens
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Process secret used to sign tokens
    pub jwt_secret: String,
    /// Access token expiration time in minutes
    pub access_token_expiration: i64,
    /// Refresh token expiration time in minutes
    pub refresh_token_expiration: i64,
}

fn minutes_from_env(key: &str, default: i64) -> Result<i64, ConfigError> {
    let minutes = match env::var(key) {
        Ok(raw) => raw.parse::<i64>().map_err(|e| {
            error!("Invalid {} value: {}", key, e);
            ConfigError::InvalidValue(format!("{}: {}", key, e))
        })?,
        Err(_) => {
            warn!("{} not set, using default: {} minutes", key, default);
            default
        }
    };
    if minutes <= 0 {
        error!("{} must be greater than 0", key);
        return Err(ConfigError::InvalidValue(format!("{} must be greater than 0", key)));
    }
    Ok(minutes)
}

impl JwtConfig {
    /// Load JWT configuration from environment variables
    ///
    /// Expected environment variables:
    /// - JWT_SECRET: Secret key for signing tokens (required, at least 32 characters)
    /// - JWT_ACCESS_TOKEN_EXPIRY: Access token expiration in minutes (defaults to 60)
    /// - JWT_REFRESH_TOKEN_EXPIRY: Refresh token expiration in minutes (defaults to 10080 = 1 week)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading JWT configuration from environment variables");

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| {
                error!("JWT_SECRET environment variable not found");
                ConfigError::EnvVarNotFound("JWT_SECRET".to_string())
            })?;
        debug!("JWT secret loaded (length: {} chars)", jwt_secret.len());

        let config = JwtConfig {
            jwt_secret,
            access_token_expiration: minutes_from_env("JWT_ACCESS_TOKEN_EXPIRY", 60)?,
            refresh_token_expiration: minutes_from_env("JWT_REFRESH_TOKEN_EXPIRY", 10080)?,
        };

        config.validate()?;
        info!("JWT configuration loaded successfully");
        Ok(config)
    }

    /// Validate the JWT configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.len() < MIN_SECRET_LEN {
            error!("JWT secret is too short (minimum {} characters required)", MIN_SECRET_LEN);
            return Err(ConfigError::ValidationError(format!(
                "JWT secret must be at least {} characters long",
                MIN_SECRET_LEN
            )));
        }

        if self.access_token_expiration <= 0 || self.refresh_token_expiration <= 0 {
            error!("Token expiration must be greater than 0");
            return Err(ConfigError::ValidationError("Token expiration must be greater than 0".to_string()));
        }

        if self.access_token_expiration >= self.refresh_token_expiration {
            warn!("Access token expiration is greater than or equal to refresh token expiration");
        }

        Ok(())
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        JwtConfig {
            jwt_secret: "test_secret_key_for_counseling_scheduler_sessions_only".to_string(),
            access_token_expiration: 60,
            refresh_token_expiration: 10080, // 1 week
        }
    }
}
