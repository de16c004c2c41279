use std::env;
use serde::{Serialize, Deserialize};
use crate::config::ConfigError;

/// Credentials for the admin account created on first start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUserConfig {
    pub username: String,
    pub password: String,
    pub id_number: String,
    pub birthdate: String,
}

fn required(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::EnvVarNotFound(key.to_string()))
}

impl AdminUserConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(AdminUserConfig {
            username: required("ADMIN_USERNAME")?,
            password: required("ADMIN_PASSWORD")?,
            id_number: required("ADMIN_ID_NUMBER")?,
            birthdate: required("ADMIN_BIRTHDATE")?,
        })
    }
}
