use thiserror::Error;

/// Errors from intern, category and competency records
#[derive(Error, Debug)]
pub enum ProgramError {
    #[error("Intern not found: {0}")]
    InternNotFound(String),

    #[error("Intern email already registered: {0}")]
    DuplicateInternEmail(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Category already exists: {0}")]
    DuplicateCategory(String),

    #[error("Supervisor account not found or not a supervisor: {0}")]
    InvalidSupervisor(String),

    #[error("Invalid field {field}: {reason}")]
    InvalidField { field: String, reason: String },
}

impl ProgramError {
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
