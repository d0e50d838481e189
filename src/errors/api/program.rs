use crate::errors::internal::{CredentialError, EvaluationError, InternalError, ProgramError};
use crate::types::internal::evaluation::ScoreViolation;
use poem_openapi::{payload::Json, ApiResponse, Object};
use std::fmt;

/// Standardized error response for program endpoints
#[derive(Object, Debug)]
pub struct ProgramErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// One rejected field or score entry
#[derive(Object, Debug, Clone, PartialEq)]
pub struct ViolationDetail {
    /// Machine-readable violation code
    pub code: String,

    /// Competency the violation refers to, when it concerns a score entry
    pub competency_id: Option<String>,

    /// Human-readable description
    pub message: String,
}

impl From<&ScoreViolation> for ViolationDetail {
    fn from(violation: &ScoreViolation) -> Self {
        Self {
            code: violation.code().to_string(),
            competency_id: violation.competency_id().map(str::to_string),
            message: violation.to_string(),
        }
    }
}

/// Error response listing every violation of a rejected submission
#[derive(Object, Debug)]
pub struct ValidationErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,

    /// All violations found in the submission
    pub violations: Vec<ViolationDetail>,
}

/// Errors for intern, competency and evaluation endpoints
#[derive(ApiResponse, Debug)]
pub enum ProgramApiError {
    /// Missing or invalid bearer token
    #[oai(status = 401)]
    Unauthorized(Json<ProgramErrorResponse>),

    /// Caller's role may not perform this operation
    #[oai(status = 403)]
    Forbidden(Json<ProgramErrorResponse>),

    /// Referenced record does not exist
    #[oai(status = 404)]
    NotFound(Json<ProgramErrorResponse>),

    /// Record conflicts with an existing one
    #[oai(status = 409)]
    Conflict(Json<ProgramErrorResponse>),

    /// A request field is invalid
    #[oai(status = 400)]
    InvalidField(Json<ProgramErrorResponse>),

    /// Evaluation submission rejected
    #[oai(status = 400)]
    ValidationFailed(Json<ValidationErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ProgramErrorResponse>),
}

impl ProgramApiError {
    fn build(
        variant: fn(Json<ProgramErrorResponse>) -> Self,
        error: &str,
        message: impl Into<String>,
        status_code: u16,
    ) -> Self {
        variant(Json(ProgramErrorResponse {
            error: error.to_string(),
            message: message.into(),
            status_code,
        }))
    }

    pub fn unauthorized() -> Self {
        Self::build(Self::Unauthorized, "unauthorized", "Authentication required", 401)
    }

    pub fn forbidden(reason: &str) -> Self {
        Self::build(Self::Forbidden, "forbidden", format!("Forbidden: {}", reason), 403)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::build(Self::NotFound, "not_found", message, 404)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::build(Self::Conflict, "conflict", message, 409)
    }

    pub fn invalid_field(message: impl Into<String>) -> Self {
        Self::build(Self::InvalidField, "invalid_field", message, 400)
    }

    pub fn validation_failed(violations: &[ScoreViolation]) -> Self {
        ProgramApiError::ValidationFailed(Json(ValidationErrorResponse {
            error: "validation_failed".to_string(),
            message: format!("Evaluation rejected with {} violation(s)", violations.len()),
            status_code: 400,
            violations: violations.iter().map(ViolationDetail::from).collect(),
        }))
    }

    fn internal_server_error() -> Self {
        Self::build(Self::InternalError, "internal_error", "An internal error occurred", 500)
    }

    /// Convert InternalError to ProgramApiError
    ///
    /// Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match err {
            InternalError::Forbidden(reason) => Self::forbidden(&reason),
            InternalError::Credential(CredentialError::InvalidToken { .. })
            | InternalError::Credential(CredentialError::ExpiredToken(_)) => Self::unauthorized(),

            InternalError::Evaluation(EvaluationError::Validation(violations)) => {
                tracing::debug!("Evaluation rejected with {} violation(s)", violations.len());
                Self::validation_failed(&violations)
            }
            InternalError::Evaluation(e @ EvaluationError::EvaluationNotFound(_)) => Self::not_found(e.to_string()),

            InternalError::Program(e @ ProgramError::InternNotFound(_))
            | InternalError::Program(e @ ProgramError::CategoryNotFound(_)) => Self::not_found(e.to_string()),
            InternalError::Program(e @ ProgramError::DuplicateInternEmail(_))
            | InternalError::Program(e @ ProgramError::DuplicateCategory(_)) => Self::conflict(e.to_string()),
            InternalError::Program(e @ ProgramError::InvalidSupervisor(_))
            | InternalError::Program(e @ ProgramError::InvalidField { .. }) => Self::invalid_field(e.to_string()),

            other => {
                tracing::error!("Unexpected error in program operation: {}", other);
                Self::internal_server_error()
            }
        }
    }

    /// Get the HTTP status code from the error variant
    pub fn status_code(&self) -> u16 {
        match self {
            ProgramApiError::ValidationFailed(json) => json.0.status_code,
            ProgramApiError::Unauthorized(json)
            | ProgramApiError::Forbidden(json)
            | ProgramApiError::NotFound(json)
            | ProgramApiError::Conflict(json)
            | ProgramApiError::InvalidField(json)
            | ProgramApiError::InternalError(json) => json.0.status_code,
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            ProgramApiError::ValidationFailed(json) => json.0.message.clone(),
            ProgramApiError::Unauthorized(json)
            | ProgramApiError::Forbidden(json)
            | ProgramApiError::NotFound(json)
            | ProgramApiError::Conflict(json)
            | ProgramApiError::InvalidField(json)
            | ProgramApiError::InternalError(json) => json.0.message.clone(),
        }
    }
}

impl From<InternalError> for ProgramApiError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for ProgramApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
