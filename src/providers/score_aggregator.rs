use std::collections::HashSet;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::internal::EvaluationError;
use crate::errors::InternalError;
use crate::types::internal::evaluation::{
    EvaluationDraft, EvaluationSubmission, ScoreEntry, ScoreViolation, MAX_GENERAL_COMMENTS_LEN, MAX_SCORE,
    MAX_SCORE_COMMENT_LEN,
};

/// Decimal places kept on the average score
const AVERAGE_SCALE: u32 = 2;

/// Validates a scored evaluation and computes its average
///
/// Pure: knows nothing about which interns or competencies exist. The
/// coordinator adds those checks before calling `aggregate`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreAggregator;

impl ScoreAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Collect every structural violation in the submission
    ///
    /// Scores outside `0..=MAX_SCORE`, overlong comments and repeated
    /// competencies are all reported, in entry order.
    pub fn validate(&self, submission: &EvaluationSubmission) -> Vec<ScoreViolation> {
        let mut violations = Vec::new();
        let mut seen = HashSet::new();
        let mut reported_duplicates = HashSet::new();

        for entry in &submission.scores {
            if !(0..=MAX_SCORE).contains(&entry.score) {
                violations.push(ScoreViolation::ScoreOutOfRange {
                    competency_id: entry.competency_id.clone(),
                    score: entry.score,
                });
            }

            if let Some(comment) = &entry.comment {
                let length = comment.chars().count();
                if length > MAX_SCORE_COMMENT_LEN {
                    violations.push(ScoreViolation::CommentTooLong {
                        competency_id: entry.competency_id.clone(),
                        length,
                    });
                }
            }

            if !seen.insert(entry.competency_id.as_str())
                && reported_duplicates.insert(entry.competency_id.as_str())
            {
                violations.push(ScoreViolation::DuplicateCompetency {
                    competency_id: entry.competency_id.clone(),
                });
            }
        }

        if let Some(comments) = &submission.general_comments {
            let length = comments.chars().count();
            if length > MAX_GENERAL_COMMENTS_LEN {
                violations.push(ScoreViolation::GeneralCommentsTooLong { length });
            }
        }

        violations
    }

    /// Mean of the scores rounded to two places, midpoint to even
    ///
    /// An empty set averages to zero.
    pub fn average(&self, scores: &[ScoreEntry]) -> Decimal {
        if scores.is_empty() {
            return Decimal::ZERO;
        }

        let sum: Decimal = scores.iter().map(|entry| Decimal::from(entry.score)).sum();
        let mean = sum / Decimal::from(scores.len());

        mean.round_dp_with_strategy(AVERAGE_SCALE, RoundingStrategy::MidpointNearestEven)
    }

    /// Validate the submission and build the draft ready for persistence
    ///
    /// `extra_violations` are prepended; they come from lookups the caller
    /// performed (inactive intern, unknown competencies).
    pub fn aggregate(
        &self,
        submission: EvaluationSubmission,
        extra_violations: Vec<ScoreViolation>,
    ) -> Result<EvaluationDraft, EvaluationError> {
        let mut violations = extra_violations;
        violations.extend(self.validate(&submission));

        if !violations.is_empty() {
            return Err(EvaluationError::Validation(violations));
        }

        let average_score = self.average(&submission.scores);

        Ok(EvaluationDraft {
            intern_id: submission.intern_id,
            evaluator_id: submission.evaluator_id,
            date: submission.date,
            general_comments: submission.general_comments,
            average_score,
            scores: submission.scores,
        })
    }
}

/// Convert a two-place average into the integer hundredths stored in the database
pub fn average_to_hundredths(average: Decimal) -> Result<i32, InternalError> {
    (average * Decimal::ONE_HUNDRED)
        .round()
        .to_i32()
        .ok_or_else(|| InternalError::parse("average_score", format!("{} does not fit in hundredths", average)))
}

/// Convert stored hundredths back into a two-place average
pub fn average_from_hundredths(hundredths: i32) -> Decimal {
    Decimal::new(i64::from(hundredths), AVERAGE_SCALE)
}
