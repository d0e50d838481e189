use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::errors::internal::EvaluationError;
use crate::errors::InternalError;
use crate::providers::score_aggregator::{average_from_hundredths, average_to_hundredths};
use crate::types::db::{competency_score, evaluation};
use crate::types::internal::evaluation::{EvaluationDraft, EvaluationRecord, ScoreEntry};

/// EvaluationStore persists evaluations together with their competency scores
pub struct EvaluationStore;

impl EvaluationStore {
    pub fn new() -> Self {
        Self
    }

    /// Insert the evaluation header and every score row
    ///
    /// Callers pass a transaction so the header never exists without its rows.
    pub async fn insert_evaluation(
        &self,
        conn: &impl ConnectionTrait,
        draft: EvaluationDraft,
    ) -> Result<EvaluationRecord, InternalError> {
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now().timestamp();

        evaluation::ActiveModel {
            id: Set(id.clone()),
            intern_id: Set(draft.intern_id.clone()),
            evaluator_id: Set(draft.evaluator_id.clone()),
            evaluation_date: Set(draft.date),
            general_comments: Set(draft.general_comments.clone()),
            average_score_hundredths: Set(average_to_hundredths(draft.average_score)?),
            created_at: Set(created_at),
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("insert_evaluation", e))?;

        for entry in &draft.scores {
            competency_score::ActiveModel {
                id: NotSet,
                evaluation_id: Set(id.clone()),
                competency_id: Set(entry.competency_id.clone()),
                score: Set(entry.score),
                comment: Set(entry.comment.clone()),
            }
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_competency_score", e))?;
        }

        Ok(EvaluationRecord {
            id,
            intern_id: draft.intern_id,
            evaluator_id: draft.evaluator_id,
            date: draft.date,
            general_comments: draft.general_comments,
            average_score: draft.average_score,
            scores: draft.scores,
            created_at,
        })
    }

    pub async fn get_evaluation(
        &self,
        conn: &impl ConnectionTrait,
        evaluation_id: &str,
    ) -> Result<EvaluationRecord, InternalError> {
        let header = evaluation::Entity::find_by_id(evaluation_id.to_owned())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_evaluation", e))?
            .ok_or_else(|| EvaluationError::EvaluationNotFound(evaluation_id.to_owned()))?;

        let scores = self.scores_for(conn, &header.id).await?;

        Ok(Self::to_record(header, scores))
    }

    /// Evaluations of an intern, most recent date first
    pub async fn list_for_intern(
        &self,
        conn: &impl ConnectionTrait,
        intern_id: &str,
    ) -> Result<Vec<EvaluationRecord>, InternalError> {
        let headers = evaluation::Entity::find()
            .filter(evaluation::Column::InternId.eq(intern_id))
            .order_by_desc(evaluation::Column::EvaluationDate)
            .order_by_desc(evaluation::Column::CreatedAt)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_evaluations_for_intern", e))?;

        let mut records = Vec::with_capacity(headers.len());
        for header in headers {
            let scores = self.scores_for(conn, &header.id).await?;
            records.push(Self::to_record(header, scores));
        }

        Ok(records)
    }

    async fn scores_for(
        &self,
        conn: &impl ConnectionTrait,
        evaluation_id: &str,
    ) -> Result<Vec<ScoreEntry>, InternalError> {
        let rows = competency_score::Entity::find()
            .filter(competency_score::Column::EvaluationId.eq(evaluation_id))
            .order_by_asc(competency_score::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("get_competency_scores", e))?;

        Ok(rows
            .into_iter()
            .map(|row| ScoreEntry {
                competency_id: row.competency_id,
                score: row.score,
                comment: row.comment,
            })
            .collect())
    }

    fn to_record(header: evaluation::Model, scores: Vec<ScoreEntry>) -> EvaluationRecord {
        EvaluationRecord {
            id: header.id,
            intern_id: header.intern_id,
            evaluator_id: header.evaluator_id,
            date: header.evaluation_date,
            general_comments: header.general_comments,
            average_score: average_from_hundredths(header.average_score_hundredths),
            scores,
            created_at: header.created_at,
        }
    }
}

impl Default for EvaluationStore {
    fn default() -> Self {
        Self::new()
    }
}
