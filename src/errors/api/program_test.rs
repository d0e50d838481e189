#[cfg(test)]
mod tests {
    use crate::errors::internal::{EvaluationError, InternalError, ProgramError};
    use crate::errors::ProgramApiError;
    use crate::types::internal::evaluation::ScoreViolation;

    #[test]
    fn test_validation_error_carries_every_violation() {
        let internal_err = InternalError::from(EvaluationError::Validation(vec![
            ScoreViolation::ScoreOutOfRange {
                competency_id: "c-1".to_string(),
                score: 6,
            },
            ScoreViolation::GeneralCommentsTooLong { length: 2001 },
        ]));

        match ProgramApiError::from_internal_error(internal_err) {
            ProgramApiError::ValidationFailed(json) => {
                assert_eq!(json.0.status_code, 400);
                assert_eq!(json.0.violations.len(), 2);
                assert_eq!(json.0.violations[0].code, "score_out_of_range");
                assert_eq!(json.0.violations[0].competency_id.as_deref(), Some("c-1"));
                assert_eq!(json.0.violations[1].competency_id, None);
            }
            other => panic!("Expected ValidationFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_intern_converts_to_not_found() {
        let api_err = ProgramApiError::from_internal_error(InternalError::from(ProgramError::InternNotFound(
            "i-9".to_string(),
        )));

        assert_eq!(api_err.status_code(), 404);
        assert!(api_err.message().contains("i-9"));
    }

    #[test]
    fn test_duplicate_category_converts_to_conflict() {
        let api_err = ProgramApiError::from_internal_error(InternalError::from(ProgramError::DuplicateCategory(
            "Communication".to_string(),
        )));

        assert_eq!(api_err.status_code(), 409);
    }

    #[test]
    fn test_forbidden_converts_to_403() {
        let api_err = ProgramApiError::from_internal_error(InternalError::forbidden("evaluator role required"));

        assert_eq!(api_err.status_code(), 403);
    }
}
