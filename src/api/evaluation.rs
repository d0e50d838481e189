use std::sync::Arc;

use poem::Request;
use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};

use crate::api::BearerAuth;
use crate::app_data::AppData;
use crate::coordinators::EvaluationCoordinator;
use crate::errors::ProgramApiError;
use crate::providers::TokenProvider;
use crate::types::dto::program::{EvaluationResponse, SubmitEvaluationRequest};
use crate::types::internal::context::RequestContext;

/// Competency evaluations
pub struct EvaluationApi {
    evaluation_coordinator: Arc<EvaluationCoordinator>,
    token_provider: Arc<TokenProvider>,
}

impl EvaluationApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            token_provider: app_data.token_provider.clone(),
            evaluation_coordinator: Arc::new(EvaluationCoordinator::new(app_data)),
        }
    }
}

#[derive(Tags)]
enum EvaluationTags {
    /// Competency evaluations
    Evaluations,
}

#[OpenApi]
impl EvaluationApi {
    /// Score an intern
    ///
    /// Every entry is validated; on any violation nothing is stored and all
    /// violations are returned together. The evaluator is the signed-in account.
    #[oai(path = "/evaluations", method = "post", tag = "EvaluationTags::Evaluations")]
    async fn submit(
        &self,
        req: &Request,
        _auth: BearerAuth,
        body: Json<SubmitEvaluationRequest>,
    ) -> Result<Json<EvaluationResponse>, ProgramApiError> {
        let ctx = RequestContext::from_request(req, &self.token_provider);
        let submission = body.0.into_submission(ctx.actor_id.clone());
        let record = self.evaluation_coordinator.submit(&ctx, submission).await?;
        Ok(Json(record.into()))
    }

    #[oai(path = "/evaluations/:evaluation_id", method = "get", tag = "EvaluationTags::Evaluations")]
    async fn get(
        &self,
        req: &Request,
        _auth: BearerAuth,
        evaluation_id: Path<String>,
    ) -> Result<Json<EvaluationResponse>, ProgramApiError> {
        let ctx = RequestContext::from_request(req, &self.token_provider);
        let record = self.evaluation_coordinator.get(&ctx, &evaluation_id.0).await?;
        Ok(Json(record.into()))
    }

    /// Evaluations of an intern, most recent first
    #[oai(path = "/interns/:intern_id/evaluations", method = "get", tag = "EvaluationTags::Evaluations")]
    async fn list_for_intern(
        &self,
        req: &Request,
        _auth: BearerAuth,
        intern_id: Path<String>,
    ) -> Result<Json<Vec<EvaluationResponse>>, ProgramApiError> {
        let ctx = RequestContext::from_request(req, &self.token_provider);
        let records = self.evaluation_coordinator.list_for_intern(&ctx, &intern_id.0).await?;
        Ok(Json(records.into_iter().map(EvaluationResponse::from).collect()))
    }
}
