use chrono::NaiveDate;
use poem_openapi::Object;

use crate::stores::{NewCompetency, NewIntern};
use crate::types::db::{category, competency, intern};
use crate::types::internal::evaluation::{EvaluationRecord, EvaluationSubmission, ScoreEntry};

#[derive(Object, Debug)]
pub struct CreateCategoryRequest {
    pub name: String,
}

#[derive(Object, Debug)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub created_at: i64,
}

impl From<category::Model> for CategoryResponse {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at,
        }
    }
}

#[derive(Object, Debug)]
pub struct CreateCompetencyRequest {
    pub category_id: String,
    pub name: String,
    pub description: Option<String>,

    /// Defaults to true
    pub active: Option<bool>,
}

impl From<CreateCompetencyRequest> for NewCompetency {
    fn from(req: CreateCompetencyRequest) -> Self {
        Self {
            category_id: req.category_id,
            name: req.name,
            description: req.description,
            active: req.active.unwrap_or(true),
        }
    }
}

#[derive(Object, Debug)]
pub struct CompetencyResponse {
    pub id: String,
    pub category_id: String,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
}

impl From<competency::Model> for CompetencyResponse {
    fn from(model: competency::Model) -> Self {
        Self {
            id: model.id,
            category_id: model.category_id,
            name: model.name,
            description: model.description,
            active: model.active,
        }
    }
}

#[derive(Object, Debug)]
pub struct CreateInternRequest {
    pub full_name: String,
    pub email: String,
    pub institution: String,
    pub course: String,

    /// Account id of the supervising staff member
    pub supervisor_id: Option<String>,

    /// Defaults to true
    pub active: Option<bool>,
}

impl From<CreateInternRequest> for NewIntern {
    fn from(req: CreateInternRequest) -> Self {
        Self {
            full_name: req.full_name,
            email: req.email,
            institution: req.institution,
            course: req.course,
            supervisor_id: req.supervisor_id,
            active: req.active.unwrap_or(true),
        }
    }
}

#[derive(Object, Debug)]
pub struct InternResponse {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub institution: String,
    pub course: String,
    pub supervisor_id: Option<String>,
    pub active: bool,
}

impl From<intern::Model> for InternResponse {
    fn from(model: intern::Model) -> Self {
        Self {
            id: model.id,
            full_name: model.full_name,
            email: model.email,
            institution: model.institution,
            course: model.course,
            supervisor_id: model.supervisor_id,
            active: model.active,
        }
    }
}

/// One competency score
#[derive(Object, Debug, Clone)]
pub struct ScoreItem {
    pub competency_id: String,

    /// Integer from 0 to 5
    pub score: i32,

    /// Up to 500 characters
    pub comment: Option<String>,
}

impl From<ScoreItem> for ScoreEntry {
    fn from(item: ScoreItem) -> Self {
        Self {
            competency_id: item.competency_id,
            score: item.score,
            comment: item.comment,
        }
    }
}

impl From<ScoreEntry> for ScoreItem {
    fn from(entry: ScoreEntry) -> Self {
        Self {
            competency_id: entry.competency_id,
            score: entry.score,
            comment: entry.comment,
        }
    }
}

/// Evaluation submitted by a staff member
#[derive(Object, Debug)]
pub struct SubmitEvaluationRequest {
    pub intern_id: String,
    pub date: NaiveDate,

    /// Up to 2000 characters
    pub general_comments: Option<String>,

    pub scores: Vec<ScoreItem>,
}

impl SubmitEvaluationRequest {
    /// Submission on behalf of `evaluator_id`
    pub fn into_submission(self, evaluator_id: impl Into<String>) -> EvaluationSubmission {
        EvaluationSubmission {
            intern_id: self.intern_id,
            evaluator_id: evaluator_id.into(),
            date: self.date,
            general_comments: self.general_comments,
            scores: self.scores.into_iter().map(ScoreEntry::from).collect(),
        }
    }
}

#[derive(Object, Debug)]
pub struct EvaluationResponse {
    pub id: String,
    pub intern_id: String,
    pub evaluator_id: String,
    pub date: NaiveDate,
    pub general_comments: Option<String>,

    /// Mean of the scores with two decimal places, e.g. "3.67"
    pub average_score: String,

    pub scores: Vec<ScoreItem>,
    pub created_at: i64,
}

impl From<EvaluationRecord> for EvaluationResponse {
    fn from(record: EvaluationRecord) -> Self {
        Self {
            id: record.id,
            intern_id: record.intern_id,
            evaluator_id: record.evaluator_id,
            date: record.date,
            general_comments: record.general_comments,
            average_score: format!("{:.2}", record.average_score),
            scores: record.scores.into_iter().map(ScoreItem::from).collect(),
            created_at: record.created_at,
        }
    }
}
