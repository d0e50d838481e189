use std::sync::Arc;

use poem::Request;
use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};

use crate::api::BearerAuth;
use crate::app_data::AppData;
use crate::coordinators::AdminCoordinator;
use crate::errors::AdminError;
use crate::providers::TokenProvider;
use crate::types::dto::admin::{AccountResponse, CreateAccountRequest};
use crate::types::internal::context::RequestContext;

/// Account administration endpoints
pub struct AdminApi {
    admin_coordinator: Arc<AdminCoordinator>,
    token_provider: Arc<TokenProvider>,
}

impl AdminApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            token_provider: app_data.token_provider.clone(),
            admin_coordinator: Arc::new(AdminCoordinator::new(app_data)),
        }
    }
}

/// API tags for admin endpoints
#[derive(Tags)]
enum AdminTags {
    /// Account administration
    Admin,
}

#[OpenApi(prefix_path = "/admin")]
impl AdminApi {
    /// Provision an account
    ///
    /// A temporary password is generated and emailed. The account must change
    /// it on first access.
    #[oai(path = "/accounts", method = "post", tag = "AdminTags::Admin")]
    async fn create_account(
        &self,
        req: &Request,
        _auth: BearerAuth,
        body: Json<CreateAccountRequest>,
    ) -> Result<Json<AccountResponse>, AdminError> {
        let ctx = RequestContext::from_request(req, &self.token_provider);
        let provisioned = self
            .admin_coordinator
            .create_account(&ctx, &body.email, &body.display_name, body.role)
            .await?;
        Ok(Json(provisioned.into()))
    }

    /// Reset an account's password
    ///
    /// Emails a new temporary password, revokes refresh tokens and sends the
    /// account back through first access.
    #[oai(path = "/accounts/:account_id/reset-password", method = "post", tag = "AdminTags::Admin")]
    async fn reset_password(
        &self,
        req: &Request,
        _auth: BearerAuth,
        account_id: Path<String>,
    ) -> Result<Json<AccountResponse>, AdminError> {
        let ctx = RequestContext::from_request(req, &self.token_provider);
        let provisioned = self.admin_coordinator.reset_password(&ctx, &account_id.0).await?;
        Ok(Json(provisioned.into()))
    }
}
