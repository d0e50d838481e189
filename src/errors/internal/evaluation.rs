use thiserror::Error;

use crate::types::internal::evaluation::ScoreViolation;

#[derive(Error, Debug)]
pub enum EvaluationError {
    /// Every offending entry of the submission, collected in one pass
    #[error("Evaluation rejected: {}", summarize(.0))]
    Validation(Vec<ScoreViolation>),

    #[error("Evaluation not found: {0}")]
    EvaluationNotFound(String),
}

fn summarize(violations: &[ScoreViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
