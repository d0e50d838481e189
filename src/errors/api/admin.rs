use crate::errors::internal::{CredentialError, InternalError};
use poem_openapi::{payload::Json, ApiResponse, Object};
use std::fmt;

/// Standardized error response for admin endpoints
#[derive(Object, Debug)]
pub struct AdminErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// Admin operation error types
#[derive(ApiResponse, Debug)]
pub enum AdminError {
    /// Missing or invalid bearer token
    #[oai(status = 401)]
    Unauthorized(Json<AdminErrorResponse>),

    /// Administrator role required
    #[oai(status = 403)]
    AdministratorRequired(Json<AdminErrorResponse>),

    /// Account not found
    #[oai(status = 404)]
    AccountNotFound(Json<AdminErrorResponse>),

    /// Email already in use
    #[oai(status = 409)]
    DuplicateEmail(Json<AdminErrorResponse>),

    /// Request field is invalid
    #[oai(status = 400)]
    InvalidField(Json<AdminErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<AdminErrorResponse>),
}

impl AdminError {
    fn build(
        variant: fn(Json<AdminErrorResponse>) -> Self,
        error: &str,
        message: impl Into<String>,
        status_code: u16,
    ) -> Self {
        variant(Json(AdminErrorResponse {
            error: error.to_string(),
            message: message.into(),
            status_code,
        }))
    }

    /// Create an Unauthorized error
    pub fn unauthorized() -> Self {
        Self::build(Self::Unauthorized, "unauthorized", "Authentication required", 401)
    }

    /// Create an AdministratorRequired error
    pub fn administrator_required() -> Self {
        Self::build(Self::AdministratorRequired, "administrator_required", "Administrator role required", 403)
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(account_id: &str) -> Self {
        Self::build(Self::AccountNotFound, "account_not_found", format!("Account not found: {}", account_id), 404)
    }

    /// Create a DuplicateEmail error
    pub fn duplicate_email(email: &str) -> Self {
        Self::build(Self::DuplicateEmail, "duplicate_email", format!("Email already in use: {}", email), 409)
    }

    /// Create an InvalidField error
    pub fn invalid_field(message: impl Into<String>) -> Self {
        Self::build(Self::InvalidField, "invalid_field", message, 400)
    }

    fn internal_server_error() -> Self {
        Self::build(Self::InternalError, "internal_error", "An internal error occurred", 500)
    }

    /// Convert InternalError to AdminError
    ///
    /// Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Forbidden(reason) => {
                tracing::debug!("Admin operation denied: {}", reason);
                Self::administrator_required()
            }
            InternalError::Credential(CredentialError::InvalidToken { .. })
            | InternalError::Credential(CredentialError::ExpiredToken(_)) => Self::unauthorized(),
            InternalError::Credential(CredentialError::AccountNotFound(account_id)) => {
                Self::account_not_found(account_id)
            }
            InternalError::Credential(CredentialError::DuplicateEmail(email)) => {
                tracing::warn!("Duplicate email in admin operation: {}", email);
                Self::duplicate_email(email)
            }
            InternalError::Credential(CredentialError::PasswordValidationFailed(message)) => {
                Self::invalid_field(message.clone())
            }
            InternalError::Credential(e @ CredentialError::InvalidField { .. }) => Self::invalid_field(e.to_string()),
            _ => {
                tracing::error!("Unexpected error in admin operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    fn body(&self) -> &AdminErrorResponse {
        match self {
            AdminError::Unauthorized(json)
            | AdminError::AdministratorRequired(json)
            | AdminError::AccountNotFound(json)
            | AdminError::DuplicateEmail(json)
            | AdminError::InvalidField(json)
            | AdminError::InternalError(json) => &json.0,
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

impl From<InternalError> for AdminError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
