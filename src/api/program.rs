use std::sync::Arc;

use poem::Request;
use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};

use crate::api::BearerAuth;
use crate::app_data::AppData;
use crate::coordinators::ProgramCoordinator;
use crate::errors::ProgramApiError;
use crate::providers::TokenProvider;
use crate::types::dto::program::{
    CategoryResponse, CompetencyResponse, CreateCategoryRequest, CreateCompetencyRequest, CreateInternRequest,
    InternResponse,
};
use crate::types::internal::context::RequestContext;

/// Categories, competencies and interns
pub struct ProgramApi {
    program_coordinator: Arc<ProgramCoordinator>,
    token_provider: Arc<TokenProvider>,
}

impl ProgramApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            token_provider: app_data.token_provider.clone(),
            program_coordinator: Arc::new(ProgramCoordinator::new(app_data)),
        }
    }
}

#[derive(Tags)]
enum ProgramTags {
    /// Competency catalogue
    Competencies,
    /// Intern records
    Interns,
}

#[OpenApi]
impl ProgramApi {
    #[oai(path = "/categories", method = "post", tag = "ProgramTags::Competencies")]
    async fn create_category(
        &self,
        req: &Request,
        _auth: BearerAuth,
        body: Json<CreateCategoryRequest>,
    ) -> Result<Json<CategoryResponse>, ProgramApiError> {
        let ctx = RequestContext::from_request(req, &self.token_provider);
        let category = self.program_coordinator.create_category(&ctx, &body.name).await?;
        Ok(Json(category.into()))
    }

    /// List categories by name
    #[oai(path = "/categories", method = "get", tag = "ProgramTags::Competencies")]
    async fn list_categories(
        &self,
        req: &Request,
        _auth: BearerAuth,
    ) -> Result<Json<Vec<CategoryResponse>>, ProgramApiError> {
        let ctx = RequestContext::from_request(req, &self.token_provider);
        let categories = self.program_coordinator.list_categories(&ctx).await?;
        Ok(Json(categories.into_iter().map(CategoryResponse::from).collect()))
    }

    #[oai(path = "/competencies", method = "post", tag = "ProgramTags::Competencies")]
    async fn create_competency(
        &self,
        req: &Request,
        _auth: BearerAuth,
        body: Json<CreateCompetencyRequest>,
    ) -> Result<Json<CompetencyResponse>, ProgramApiError> {
        let ctx = RequestContext::from_request(req, &self.token_provider);
        let competency = self.program_coordinator.create_competency(&ctx, body.0.into()).await?;
        Ok(Json(competency.into()))
    }

    /// List active competencies
    #[oai(path = "/competencies", method = "get", tag = "ProgramTags::Competencies")]
    async fn list_competencies(
        &self,
        req: &Request,
        _auth: BearerAuth,
    ) -> Result<Json<Vec<CompetencyResponse>>, ProgramApiError> {
        let ctx = RequestContext::from_request(req, &self.token_provider);
        let competencies = self.program_coordinator.list_competencies(&ctx).await?;
        Ok(Json(competencies.into_iter().map(CompetencyResponse::from).collect()))
    }

    #[oai(path = "/interns", method = "post", tag = "ProgramTags::Interns")]
    async fn create_intern(
        &self,
        req: &Request,
        _auth: BearerAuth,
        body: Json<CreateInternRequest>,
    ) -> Result<Json<InternResponse>, ProgramApiError> {
        let ctx = RequestContext::from_request(req, &self.token_provider);
        let intern = self.program_coordinator.create_intern(&ctx, body.0.into()).await?;
        Ok(Json(intern.into()))
    }

    #[oai(path = "/interns/:intern_id", method = "get", tag = "ProgramTags::Interns")]
    async fn get_intern(
        &self,
        req: &Request,
        _auth: BearerAuth,
        intern_id: Path<String>,
    ) -> Result<Json<InternResponse>, ProgramApiError> {
        let ctx = RequestContext::from_request(req, &self.token_provider);
        let intern = self.program_coordinator.get_intern(&ctx, &intern_id.0).await?;
        Ok(Json(intern.into()))
    }
}
