use crate::errors::internal::{CredentialError, InternalError};
use poem_openapi::{payload::Json, ApiResponse, Object};
use std::fmt;

/// Standardized error response for authentication endpoints
#[derive(Object, Debug)]
pub struct AuthErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// Authentication error types
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// Invalid email or password
    #[oai(status = 401)]
    InvalidCredentials(Json<AuthErrorResponse>),

    /// Account is locked out
    #[oai(status = 403)]
    LockedOut(Json<AuthErrorResponse>),

    /// Current password is incorrect (for password change)
    #[oai(status = 401)]
    IncorrectPassword(Json<AuthErrorResponse>),

    /// Password validation failed
    #[oai(status = 400)]
    PasswordValidationFailed(Json<AuthErrorResponse>),

    /// Invalid, missing or malformed JWT
    #[oai(status = 401)]
    InvalidToken(Json<AuthErrorResponse>),

    /// JWT has expired
    #[oai(status = 401)]
    ExpiredToken(Json<AuthErrorResponse>),

    /// Invalid refresh token
    #[oai(status = 401)]
    InvalidRefreshToken(Json<AuthErrorResponse>),

    /// Refresh token has expired
    #[oai(status = 401)]
    ExpiredRefreshToken(Json<AuthErrorResponse>),

    /// Password reset token is unknown, used or expired
    #[oai(status = 400)]
    InvalidResetToken(Json<AuthErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<AuthErrorResponse>),
}

impl AuthError {
    fn build(
        variant: fn(Json<AuthErrorResponse>) -> Self,
        error: &str,
        message: impl Into<String>,
        status_code: u16,
    ) -> Self {
        variant(Json(AuthErrorResponse {
            error: error.to_string(),
            message: message.into(),
            status_code,
        }))
    }

    /// Create an InvalidCredentials error
    pub fn invalid_credentials() -> Self {
        Self::build(Self::InvalidCredentials, "invalid_credentials", "Invalid email or password", 401)
    }

    /// Create a LockedOut error
    pub fn locked_out() -> Self {
        Self::build(Self::LockedOut, "locked_out", "Account is locked out", 403)
    }

    /// Create an IncorrectPassword error
    pub fn incorrect_password() -> Self {
        Self::build(Self::IncorrectPassword, "incorrect_password", "Current password is incorrect", 401)
    }

    /// Create a PasswordValidationFailed error
    pub fn password_validation_failed(message: String) -> Self {
        Self::build(Self::PasswordValidationFailed, "password_validation_failed", message, 400)
    }

    /// Create an InvalidToken error
    pub fn invalid_token() -> Self {
        Self::build(Self::InvalidToken, "invalid_token", "Invalid or malformed JWT", 401)
    }

    /// Create an ExpiredToken error
    pub fn expired_token() -> Self {
        Self::build(Self::ExpiredToken, "expired_token", "JWT has expired", 401)
    }

    /// Create an InvalidRefreshToken error
    pub fn invalid_refresh_token() -> Self {
        Self::build(Self::InvalidRefreshToken, "invalid_refresh_token", "Invalid refresh token", 401)
    }

    /// Create an ExpiredRefreshToken error
    pub fn expired_refresh_token() -> Self {
        Self::build(Self::ExpiredRefreshToken, "expired_refresh_token", "Refresh token has expired", 401)
    }

    /// Create an InvalidResetToken error
    pub fn invalid_reset_token() -> Self {
        Self::build(
            Self::InvalidResetToken,
            "invalid_reset_token",
            "Password reset token is invalid or has expired",
            400,
        )
    }

    fn internal_server_error() -> Self {
        Self::build(Self::InternalError, "internal_error", "An internal error occurred", 500)
    }

    /// Convert InternalError to AuthError
    ///
    /// This is the explicit conversion point from internal errors to API errors.
    /// Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Database(_) => {
                tracing::error!("Database failure in auth operation: {}", err);
                Self::internal_server_error()
            }
            InternalError::Parse { value_type, .. } => {
                tracing::error!("Parse error for {}: {}", value_type, err);
                Self::internal_server_error()
            }
            InternalError::Crypto { operation, .. } => {
                tracing::error!("Crypto error in {}: {}", operation, err);
                Self::internal_server_error()
            }

            InternalError::Credential(CredentialError::InvalidCredentials) => {
                tracing::debug!("Invalid credentials attempt");
                Self::invalid_credentials()
            }
            InternalError::Credential(CredentialError::LockedOut { account_id }) => {
                tracing::warn!("Login attempt on locked out account {}", account_id);
                Self::locked_out()
            }
            InternalError::Credential(CredentialError::IncorrectPassword) => {
                tracing::debug!("Incorrect password for password change");
                Self::incorrect_password()
            }
            InternalError::Credential(CredentialError::PasswordValidationFailed(message)) => {
                tracing::debug!("Password validation failed: {}", message);
                Self::password_validation_failed(message.clone())
            }
            // Authenticated caller whose account vanished: treat as a dead token
            InternalError::Credential(CredentialError::AccountNotFound(account_id)) => {
                tracing::warn!("Token subject {} has no account", account_id);
                Self::invalid_token()
            }
            InternalError::Credential(CredentialError::InvalidToken { token_type, reason }) => {
                tracing::debug!("Invalid token: {} - {}", token_type, reason);
                match token_type.as_str() {
                    "refresh_token" => Self::invalid_refresh_token(),
                    "reset_token" => Self::invalid_reset_token(),
                    _ => Self::invalid_token(),
                }
            }
            InternalError::Credential(CredentialError::ExpiredToken(token_type)) => {
                tracing::debug!("Expired token: {}", token_type);
                match token_type.as_str() {
                    "refresh_token" => Self::expired_refresh_token(),
                    "reset_token" => Self::invalid_reset_token(),
                    _ => Self::expired_token(),
                }
            }

            _ => {
                tracing::error!("Unexpected error in auth operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    fn body(&self) -> &AuthErrorResponse {
        match self {
            AuthError::InvalidCredentials(json)
            | AuthError::LockedOut(json)
            | AuthError::IncorrectPassword(json)
            | AuthError::PasswordValidationFailed(json)
            | AuthError::InvalidToken(json)
            | AuthError::ExpiredToken(json)
            | AuthError::InvalidRefreshToken(json)
            | AuthError::ExpiredRefreshToken(json)
            | AuthError::InvalidResetToken(json)
            | AuthError::InternalError(json) => &json.0,
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        self.body().message.clone()
    }

    /// Get the HTTP status code from the error variant
    pub fn status_code(&self) -> u16 {
        self.body().status_code
    }
}

impl From<InternalError> for AuthError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
