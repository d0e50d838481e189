use std::fmt;

use thiserror::Error;

use crate::config::{EnvironmentProvider, SecretConfig, SecretType};

/// Secret loading failures
#[derive(Debug, Error, PartialEq)]
pub enum SecretError {
    #[error("Required secret '{secret_name}' is missing")]
    Missing { secret_name: String },

    #[error("Secret '{secret_name}' must be at least {expected} characters, got {actual}")]
    InvalidLength {
        secret_name: String,
        expected: usize,
        actual: usize,
    },
}

/// Centralized manager for application secrets
pub struct SecretManager {
    jwt_secret: String,
    password_pepper: String,
    token_secret: String,
}

impl SecretManager {
    /// Load and validate all secrets from the given environment
    ///
    /// # Errors
    /// Returns `SecretError` if any required secret is missing or too short
    pub fn init(env: &dyn EnvironmentProvider) -> Result<Self, SecretError> {
        let jwt_secret = Self::load_secret(env, &SecretConfig::env("JWT_SECRET").min_length(32))?;
        let password_pepper = Self::load_secret(env, &SecretConfig::env("PASSWORD_PEPPER").min_length(16))?;
        let token_secret = Self::load_secret(env, &SecretConfig::env("TOKEN_SECRET").min_length(32))?;

        Ok(Self {
            jwt_secret,
            password_pepper,
            token_secret,
        })
    }

    /// Build a manager from literal values (tests and tooling)
    pub fn from_values(jwt_secret: &str, password_pepper: &str, token_secret: &str) -> Self {
        Self {
            jwt_secret: jwt_secret.to_string(),
            password_pepper: password_pepper.to_string(),
            token_secret: token_secret.to_string(),
        }
    }

    /// Get the JWT signing secret
    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    /// Get the pepper used as the Argon2 secret parameter
    pub fn password_pepper(&self) -> &str {
        &self.password_pepper
    }

    /// Get the HMAC key for refresh and reset token hashes
    pub fn token_secret(&self) -> &str {
        &self.token_secret
    }

    pub(crate) fn load_secret(env: &dyn EnvironmentProvider, config: &SecretConfig) -> Result<String, SecretError> {
        let value = match &config.secret_type {
            SecretType::EnvVar { name } => match env.get_var(name) {
                Some(v) => v,
                None if !config.required => return Ok(String::new()),
                None => {
                    return Err(SecretError::Missing {
                        secret_name: name.clone(),
                    })
                }
            },
        };

        if let Some(min_len) = config.min_length {
            if value.len() < min_len {
                return Err(SecretError::InvalidLength {
                    secret_name: config.secret_type.name().to_string(),
                    expected: min_len,
                    actual: value.len(),
                });
            }
        }

        Ok(value)
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("jwt_secret", &"<redacted>")
            .field("password_pepper", &"<redacted>")
            .field("token_secret", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretManager {{ secrets_loaded: 3 }}")
    }
}
