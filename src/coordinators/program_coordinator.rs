use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::coordinators::require_role;
use crate::errors::InternalError;
use crate::stores::{NewCompetency, NewIntern, ProgramStore};
use crate::types::db::{category, competency, intern};
use crate::types::internal::auth::Role;
use crate::types::internal::context::RequestContext;

/// Program coordinator for categories, competencies and interns
pub struct ProgramCoordinator {
    db: DatabaseConnection,
    program_store: Arc<ProgramStore>,
}

impl ProgramCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            program_store: app_data.program_store.clone(),
        }
    }

    pub async fn create_category(&self, ctx: &RequestContext, name: &str) -> Result<category::Model, InternalError> {
        require_role(ctx, Role::manages_program, "managing program data requires Administrator or Coordinator")?;
        self.program_store.create_category(&self.db, name).await
    }

    pub async fn list_categories(&self, ctx: &RequestContext) -> Result<Vec<category::Model>, InternalError> {
        ctx.require_claims()?;
        self.program_store.list_categories(&self.db).await
    }

    pub async fn create_competency(
        &self,
        ctx: &RequestContext,
        new_competency: NewCompetency,
    ) -> Result<competency::Model, InternalError> {
        require_role(ctx, Role::manages_program, "managing program data requires Administrator or Coordinator")?;
        self.program_store.create_competency(&self.db, new_competency).await
    }

    /// Competencies that can currently be scored
    pub async fn list_competencies(&self, ctx: &RequestContext) -> Result<Vec<competency::Model>, InternalError> {
        ctx.require_claims()?;
        self.program_store.list_active_competencies(&self.db).await
    }

    pub async fn create_intern(&self, ctx: &RequestContext, new_intern: NewIntern) -> Result<intern::Model, InternalError> {
        require_role(ctx, Role::manages_program, "managing program data requires Administrator or Coordinator")?;
        self.program_store.create_intern(&self.db, new_intern).await
    }

    pub async fn get_intern(&self, ctx: &RequestContext, intern_id: &str) -> Result<intern::Model, InternalError> {
        require_role(ctx, Role::evaluates, "reading intern records requires a staff role")?;
        self.program_store.get_intern(&self.db, intern_id).await
    }
}
