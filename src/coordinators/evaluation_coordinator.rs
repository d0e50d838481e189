use std::collections::HashSet;
use std::sync::Arc;

use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::app_data::AppData;
use crate::coordinators::require_role;
use crate::errors::InternalError;
use crate::providers::ScoreAggregator;
use crate::stores::{EvaluationStore, ProgramStore};
use crate::types::internal::auth::Role;
use crate::types::internal::context::RequestContext;
use crate::types::internal::evaluation::{EvaluationRecord, EvaluationSubmission, ScoreViolation};

const EVALUATE_PERMISSION: &str = "evaluations require Administrator, Coordinator or Supervisor";

/// Evaluation coordinator: runs the scoring workflow and serves stored evaluations
pub struct EvaluationCoordinator {
    db: DatabaseConnection,
    program_store: Arc<ProgramStore>,
    evaluation_store: Arc<EvaluationStore>,
    aggregator: ScoreAggregator,
}

impl EvaluationCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            program_store: app_data.program_store.clone(),
            evaluation_store: app_data.evaluation_store.clone(),
            aggregator: ScoreAggregator::new(),
        }
    }

    /// Violations found by looking the intern and competencies up
    async fn reference_violations(
        &self,
        submission: &EvaluationSubmission,
    ) -> Result<Vec<ScoreViolation>, InternalError> {
        let mut violations = Vec::new();

        // Missing intern is a not-found error, not a violation
        let intern = self.program_store.get_intern(&self.db, &submission.intern_id).await?;
        if !intern.active {
            violations.push(ScoreViolation::InternInactive { intern_id: intern.id });
        }

        let requested: Vec<String> = submission.scores.iter().map(|s| s.competency_id.clone()).collect();
        let available = self
            .program_store
            .find_active_competency_ids(&self.db, &requested)
            .await?;

        let mut reported = HashSet::new();
        for competency_id in requested {
            if !available.contains(&competency_id) && reported.insert(competency_id.clone()) {
                violations.push(ScoreViolation::CompetencyUnavailable { competency_id });
            }
        }

        Ok(violations)
    }

    /// Orchestrate the scoring workflow
    ///
    /// 1. Check the caller may evaluate
    /// 2. Look up the intern (missing → not found) and the competencies
    /// 3. Validate every entry and compute the average
    /// 4. Persist the evaluation and its scores in one transaction
    ///
    /// The evaluator is always the signed-in account.
    pub async fn submit(
        &self,
        ctx: &RequestContext,
        mut submission: EvaluationSubmission,
    ) -> Result<EvaluationRecord, InternalError> {
        require_role(ctx, Role::evaluates, EVALUATE_PERMISSION)?;
        submission.evaluator_id = ctx.require_claims()?.sub.clone();

        let extra_violations = self.reference_violations(&submission).await?;
        let draft = match self.aggregator.aggregate(submission, extra_violations) {
            Ok(draft) => draft,
            Err(e) => {
                tracing::info!(request_id = %ctx.request_id, "Evaluation rejected: {}", e);
                return Err(e.into());
            }
        };

        let txn = self.db.begin().await.map_err(InternalError::transaction_begin)?;
        let record = self.evaluation_store.insert_evaluation(&txn, draft).await?;
        txn.commit().await.map_err(InternalError::transaction_commit)?;

        tracing::info!(
            request_id = %ctx.request_id,
            evaluation_id = %record.id,
            intern_id = %record.intern_id,
            average_score = %record.average_score,
            scores = record.scores.len(),
            "Evaluation recorded"
        );

        Ok(record)
    }

    pub async fn get(&self, ctx: &RequestContext, evaluation_id: &str) -> Result<EvaluationRecord, InternalError> {
        require_role(ctx, Role::evaluates, EVALUATE_PERMISSION)?;
        self.evaluation_store.get_evaluation(&self.db, evaluation_id).await
    }

    /// Evaluations of an intern, most recent first
    pub async fn list_for_intern(
        &self,
        ctx: &RequestContext,
        intern_id: &str,
    ) -> Result<Vec<EvaluationRecord>, InternalError> {
        require_role(ctx, Role::evaluates, EVALUATE_PERMISSION)?;
        self.program_store.get_intern(&self.db, intern_id).await?;
        self.evaluation_store.list_for_intern(&self.db, intern_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::{EvaluationError, ProgramError};
    use crate::test::utils::{new_intern, seed_competencies, setup_test_app_data, signed_in};
    use crate::types::db::{competency_score, evaluation};
    use crate::types::internal::evaluation::ScoreEntry;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use sea_orm::EntityTrait;

    struct Fixture {
        app_data: Arc<AppData>,
        coordinator: EvaluationCoordinator,
        ctx: RequestContext,
        intern_id: String,
        competencies: Vec<String>,
    }

    async fn fixture() -> Fixture {
        let (app_data, _mail) = setup_test_app_data().await;
        let ctx = signed_in(&app_data, "sup@example.com", Role::Supervisor).await;
        let intern = app_data
            .program_store
            .create_intern(&app_data.db, new_intern("joao@example.com"))
            .await
            .unwrap();
        let competencies = seed_competencies(&app_data.db, &["Communication", "Teamwork", "Punctuality"]).await;

        Fixture {
            coordinator: EvaluationCoordinator::new(app_data.clone()),
            app_data,
            ctx,
            intern_id: intern.id,
            competencies,
        }
    }

    fn submission(intern_id: &str, scores: Vec<ScoreEntry>) -> EvaluationSubmission {
        EvaluationSubmission {
            intern_id: intern_id.to_string(),
            evaluator_id: String::new(),
            date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            general_comments: Some("Steady progress".to_string()),
            scores,
        }
    }

    fn violations(err: InternalError) -> Vec<ScoreViolation> {
        match err {
            InternalError::Evaluation(EvaluationError::Validation(violations)) => violations,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    async fn row_counts(app_data: &AppData) -> (usize, usize) {
        (
            evaluation::Entity::find().all(&app_data.db).await.unwrap().len(),
            competency_score::Entity::find().all(&app_data.db).await.unwrap().len(),
        )
    }

    #[tokio::test]
    async fn test_submit_persists_evaluation_with_average() {
        let f = fixture().await;
        let scores = vec![
            ScoreEntry::new(f.competencies[0].clone(), 4).with_comment("Clear status reports"),
            ScoreEntry::new(f.competencies[1].clone(), 5),
            ScoreEntry::new(f.competencies[2].clone(), 3),
        ];

        let record = f
            .coordinator
            .submit(&f.ctx, submission(&f.intern_id, scores.clone()))
            .await
            .unwrap();

        assert_eq!(record.average_score, Decimal::new(4, 0));
        assert_eq!(record.evaluator_id, f.ctx.require_claims().unwrap().sub);
        assert_eq!(record.scores, scores);
        assert_eq!(row_counts(&f.app_data).await, (1, 3));

        let loaded = f.coordinator.get(&f.ctx, &record.id).await.unwrap();
        assert_eq!(loaded, record);
    }

    #[tokio::test]
    async fn test_submit_rounds_average_to_two_places() {
        let f = fixture().await;
        let scores = vec![
            ScoreEntry::new(f.competencies[0].clone(), 1),
            ScoreEntry::new(f.competencies[1].clone(), 2),
            ScoreEntry::new(f.competencies[2].clone(), 2),
        ];

        let record = f.coordinator.submit(&f.ctx, submission(&f.intern_id, scores)).await.unwrap();

        assert_eq!(record.average_score, Decimal::new(167, 2));
        let loaded = f.coordinator.get(&f.ctx, &record.id).await.unwrap();
        assert_eq!(loaded.average_score, Decimal::new(167, 2));
    }

    #[tokio::test]
    async fn test_submit_with_no_scores_averages_zero() {
        let f = fixture().await;

        let record = f.coordinator.submit(&f.ctx, submission(&f.intern_id, vec![])).await.unwrap();

        assert_eq!(record.average_score, Decimal::ZERO);
        assert_eq!(row_counts(&f.app_data).await, (1, 0));
    }

    #[tokio::test]
    async fn test_out_of_range_scores_persist_nothing() {
        let f = fixture().await;
        let scores = vec![
            ScoreEntry::new(f.competencies[0].clone(), -1),
            ScoreEntry::new(f.competencies[1].clone(), 4),
            ScoreEntry::new(f.competencies[2].clone(), 7),
        ];

        let err = f.coordinator.submit(&f.ctx, submission(&f.intern_id, scores)).await.unwrap_err();

        let violations = violations(err);
        assert_eq!(violations.len(), 2);
        assert!(violations.iter().all(|v| v.code() == "score_out_of_range"));
        assert_eq!(row_counts(&f.app_data).await, (0, 0));
    }

    #[tokio::test]
    async fn test_unknown_and_inactive_competencies_are_violations() {
        let f = fixture().await;
        let category = f.app_data.program_store.create_category(&f.app_data.db, "Retired").await.unwrap();
        let inactive = f
            .app_data
            .program_store
            .create_competency(
                &f.app_data.db,
                crate::stores::NewCompetency {
                    category_id: category.id,
                    name: "Fax etiquette".to_string(),
                    description: None,
                    active: false,
                },
            )
            .await
            .unwrap();
        let scores = vec![
            ScoreEntry::new(f.competencies[0].clone(), 4),
            ScoreEntry::new(inactive.id.clone(), 4),
            ScoreEntry::new("does-not-exist", 4),
        ];

        let err = f.coordinator.submit(&f.ctx, submission(&f.intern_id, scores)).await.unwrap_err();

        let violations = violations(err);
        assert_eq!(
            violations,
            vec![
                ScoreViolation::CompetencyUnavailable {
                    competency_id: inactive.id
                },
                ScoreViolation::CompetencyUnavailable {
                    competency_id: "does-not-exist".to_string()
                },
            ]
        );
        assert_eq!(row_counts(&f.app_data).await, (0, 0));
    }

    #[tokio::test]
    async fn test_missing_intern_is_not_found() {
        let f = fixture().await;

        let err = f
            .coordinator
            .submit(&f.ctx, submission("missing", vec![ScoreEntry::new(f.competencies[0].clone(), 3)]))
            .await
            .unwrap_err();

        assert!(matches!(err, InternalError::Program(ProgramError::InternNotFound(_))));
    }

    #[tokio::test]
    async fn test_inactive_intern_is_a_violation() {
        let f = fixture().await;
        let mut input = new_intern("former@example.com");
        input.active = false;
        let former = f.app_data.program_store.create_intern(&f.app_data.db, input).await.unwrap();

        let err = f
            .coordinator
            .submit(&f.ctx, submission(&former.id, vec![ScoreEntry::new(f.competencies[0].clone(), 9)]))
            .await
            .unwrap_err();

        let violations = violations(err);
        assert_eq!(violations[0].code(), "intern_inactive");
        assert_eq!(violations[1].code(), "score_out_of_range");
    }

    #[tokio::test]
    async fn test_intern_role_cannot_submit() {
        let f = fixture().await;
        let intern_ctx = signed_in(&f.app_data, "intern@example.com", Role::Intern).await;

        let err = f
            .coordinator
            .submit(&intern_ctx, submission(&f.intern_id, vec![]))
            .await
            .unwrap_err();

        assert!(matches!(err, InternalError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_list_for_intern() {
        let f = fixture().await;
        f.coordinator
            .submit(&f.ctx, submission(&f.intern_id, vec![ScoreEntry::new(f.competencies[0].clone(), 5)]))
            .await
            .unwrap();
        f.coordinator
            .submit(&f.ctx, submission(&f.intern_id, vec![ScoreEntry::new(f.competencies[1].clone(), 2)]))
            .await
            .unwrap();

        let records = f.coordinator.list_for_intern(&f.ctx, &f.intern_id).await.unwrap();
        assert_eq!(records.len(), 2);

        assert!(matches!(
            f.coordinator.list_for_intern(&f.ctx, "missing").await,
            Err(InternalError::Program(ProgramError::InternNotFound(_)))
        ));
    }
}
