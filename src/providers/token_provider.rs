use std::fmt;
use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::prelude::*;
use uuid::Uuid;

use crate::config::SecretManager;
use crate::errors::internal::CredentialError;
use crate::errors::InternalError;
use crate::providers::crypto_provider;
use crate::types::internal::auth::{Claims, Role};

/// Provides JWT generation and validation plus opaque refresh and reset tokens
pub struct TokenProvider {
    secret_manager: Arc<SecretManager>,
    jwt_expiration_minutes: i64,
    refresh_expiration_days: i64,
    reset_expiration_minutes: i64,
}

impl TokenProvider {
    pub fn new(secret_manager: Arc<SecretManager>) -> Self {
        Self {
            secret_manager,
            jwt_expiration_minutes: 15,
            refresh_expiration_days: 7,
            reset_expiration_minutes: 60,
        }
    }

    /// Generate a JWT for the given account
    ///
    /// # Returns
    /// * `Result<(String, String), InternalError>` - Tuple of (encoded JWT, JWT ID) or an error
    pub fn generate_jwt(&self, account_id: &str, role: Role) -> Result<(String, String), InternalError> {
        let now = Utc::now().timestamp();
        let jti = Uuid::new_v4().to_string();

        let claims = Claims {
            sub: account_id.to_string(),
            role,
            exp: now + self.jwt_expiration_minutes * 60,
            iat: now,
            jti: jti.clone(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
        )
        .map_err(|e| InternalError::crypto("jwt_generation", format!("Failed to generate JWT: {}", e)))?;

        tracing::debug!(account_id = %account_id, jti = %jti, "JWT issued");

        Ok((token, jti))
    }

    /// Validate a JWT and return the claims
    pub fn validate_jwt(&self, token: &str) -> Result<Claims, InternalError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => InternalError::from(CredentialError::ExpiredToken("jwt".to_string())),
            _ => InternalError::from(CredentialError::invalid_token("jwt", "invalid signature or malformed")),
        })
    }

    /// Generate a cryptographically secure refresh token
    ///
    /// # Returns
    /// * `String` - A base64-encoded random token (32 bytes)
    pub fn generate_refresh_token(&self) -> String {
        let mut rng = rand::rng();
        let random_bytes: [u8; 32] = rng.random();
        general_purpose::STANDARD.encode(random_bytes)
    }

    /// Generate a password reset token, safe to embed in a link
    pub fn generate_reset_token(&self) -> String {
        let mut rng = rand::rng();
        let random_bytes: [u8; 32] = rng.random();
        general_purpose::URL_SAFE_NO_PAD.encode(random_bytes)
    }

    /// Hash a refresh or reset token using HMAC-SHA256
    pub fn hash_token(&self, token: &str) -> Result<String, InternalError> {
        crypto_provider::hmac_sha256_token(self.secret_manager.token_secret(), token)
    }

    /// Expiration timestamp for a refresh token issued now
    pub fn refresh_expiration(&self) -> i64 {
        Utc::now().timestamp() + self.refresh_expiration_days * 24 * 60 * 60
    }

    /// Expiration timestamp for a reset token issued now
    pub fn reset_expiration(&self) -> i64 {
        Utc::now().timestamp() + self.reset_expiration_minutes * 60
    }

    /// Access token lifetime in seconds
    pub fn jwt_lifetime_seconds(&self) -> i64 {
        self.jwt_expiration_minutes * 60
    }
}

impl fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProvider")
            .field("secret_manager", &"<redacted>")
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .field("refresh_expiration_days", &self.refresh_expiration_days)
            .field("reset_expiration_minutes", &self.reset_expiration_minutes)
            .finish()
    }
}

impl fmt::Display for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TokenProvider {{ jwt_expiration: {}min, refresh_expiration: {}days }}",
            self.jwt_expiration_minutes, self.refresh_expiration_days
        )
    }
}
