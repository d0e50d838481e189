use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Upper bound of a competency score
pub const MAX_SCORE: i32 = 5;

/// Maximum length of a per-competency comment
pub const MAX_SCORE_COMMENT_LEN: usize = 500;

/// Maximum length of the evaluation's general comments
pub const MAX_GENERAL_COMMENTS_LEN: usize = 2000;

/// One submitted `(competency, score, comment)` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub competency_id: String,
    pub score: i32,
    pub comment: Option<String>,
}

impl ScoreEntry {
    pub fn new(competency_id: impl Into<String>, score: i32) -> Self {
        Self {
            competency_id: competency_id.into(),
            score,
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Evaluation as submitted, before validation
#[derive(Debug, Clone)]
pub struct EvaluationSubmission {
    pub intern_id: String,
    pub evaluator_id: String,
    pub date: NaiveDate,
    pub general_comments: Option<String>,
    pub scores: Vec<ScoreEntry>,
}

/// Validated evaluation aggregate, ready for atomic persistence
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationDraft {
    pub intern_id: String,
    pub evaluator_id: String,
    pub date: NaiveDate,
    pub general_comments: Option<String>,
    pub average_score: Decimal,
    pub scores: Vec<ScoreEntry>,
}

/// Persisted evaluation with its score rows
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationRecord {
    pub id: String,
    pub intern_id: String,
    pub evaluator_id: String,
    pub date: NaiveDate,
    pub general_comments: Option<String>,
    pub average_score: Decimal,
    pub scores: Vec<ScoreEntry>,
    pub created_at: i64,
}

/// A single reason an evaluation submission was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreViolation {
    ScoreOutOfRange { competency_id: String, score: i32 },
    CommentTooLong { competency_id: String, length: usize },
    DuplicateCompetency { competency_id: String },
    CompetencyUnavailable { competency_id: String },
    GeneralCommentsTooLong { length: usize },
    InternInactive { intern_id: String },
}

impl ScoreViolation {
    /// Competency the violation refers to, if any
    pub fn competency_id(&self) -> Option<&str> {
        match self {
            ScoreViolation::ScoreOutOfRange { competency_id, .. }
            | ScoreViolation::CommentTooLong { competency_id, .. }
            | ScoreViolation::DuplicateCompetency { competency_id }
            | ScoreViolation::CompetencyUnavailable { competency_id } => Some(competency_id),
            ScoreViolation::GeneralCommentsTooLong { .. } | ScoreViolation::InternInactive { .. } => None,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ScoreViolation::ScoreOutOfRange { .. } => "score_out_of_range",
            ScoreViolation::CommentTooLong { .. } => "comment_too_long",
            ScoreViolation::DuplicateCompetency { .. } => "duplicate_competency",
            ScoreViolation::CompetencyUnavailable { .. } => "competency_unavailable",
            ScoreViolation::GeneralCommentsTooLong { .. } => "general_comments_too_long",
            ScoreViolation::InternInactive { .. } => "intern_inactive",
        }
    }
}

impl fmt::Display for ScoreViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreViolation::ScoreOutOfRange { competency_id, score } => write!(
                f,
                "score {} for competency {} is outside 0..={}",
                score, competency_id, MAX_SCORE
            ),
            ScoreViolation::CommentTooLong { competency_id, length } => write!(
                f,
                "comment for competency {} has {} characters, limit is {}",
                competency_id, length, MAX_SCORE_COMMENT_LEN
            ),
            ScoreViolation::DuplicateCompetency { competency_id } => {
                write!(f, "competency {} was scored more than once", competency_id)
            }
            ScoreViolation::CompetencyUnavailable { competency_id } => {
                write!(f, "competency {} does not exist or is inactive", competency_id)
            }
            ScoreViolation::GeneralCommentsTooLong { length } => write!(
                f,
                "general comments have {} characters, limit is {}",
                length, MAX_GENERAL_COMMENTS_LEN
            ),
            ScoreViolation::InternInactive { intern_id } => {
                write!(f, "intern {} is inactive", intern_id)
            }
        }
    }
}
