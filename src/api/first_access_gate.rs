use std::sync::Arc;

use poem::web::Redirect;
use poem::{Endpoint, IntoResponse, Middleware, Request, Response, Result};

use crate::app_data::AppData;
use crate::providers::access_gate;
use crate::providers::TokenProvider;
use crate::stores::CredentialStore;
use crate::types::internal::access::{AccessState, ExemptRoute, GateDecision, Principal};
use crate::types::internal::context::RequestContext;

/// Middleware forcing accounts that still owe their first password change
/// onto the change-password route
///
/// The first-access flag is read from the credential store on every request,
/// never from token claims. Lookup failures let the request through; the
/// endpoint still enforces its own authentication.
pub struct FirstAccessGate {
    token_provider: Arc<TokenProvider>,
    credential_store: Arc<CredentialStore>,
}

impl FirstAccessGate {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            token_provider: app_data.token_provider.clone(),
            credential_store: app_data.credential_store.clone(),
        }
    }
}

impl<E: Endpoint> Middleware<E> for FirstAccessGate {
    type Output = FirstAccessGateEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        FirstAccessGateEndpoint {
            inner: ep,
            token_provider: self.token_provider.clone(),
            credential_store: self.credential_store.clone(),
        }
    }
}

pub struct FirstAccessGateEndpoint<E> {
    inner: E,
    token_provider: Arc<TokenProvider>,
    credential_store: Arc<CredentialStore>,
}

impl<E> FirstAccessGateEndpoint<E> {
    async fn principal(&self, bearer_token: Option<String>) -> Principal {
        let Some(token) = bearer_token else {
            return Principal::Anonymous;
        };
        let claims = match self.token_provider.validate_jwt(&token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!("Gate treats request as anonymous: {}", e);
                return Principal::Anonymous;
            }
        };

        match self.credential_store.first_access_completed(&claims.sub).await {
            Ok(Some(completed)) => Principal::Authenticated(AccessState::from_first_access_completed(completed)),
            Ok(None) => {
                tracing::debug!(account_id = %claims.sub, "Gate found no account for token subject");
                Principal::Anonymous
            }
            Err(e) => {
                tracing::warn!(account_id = %claims.sub, "First-access lookup failed, allowing request: {}", e);
                Principal::Anonymous
            }
        }
    }
}

impl<E: Endpoint> Endpoint for FirstAccessGateEndpoint<E> {
    type Output = Response;

    async fn call(&self, req: Request) -> Result<Self::Output> {
        let bearer_token = RequestContext::extract_bearer(&req).map(|bearer| bearer.token);
        let principal = self.principal(bearer_token).await;

        match access_gate::decide(req.uri().path(), principal) {
            GateDecision::Allow => self.inner.call(req).await.map(IntoResponse::into_response),
            GateDecision::RedirectToChangePassword => {
                tracing::info!(path = %req.uri().path(), "Redirecting to change password before first access");
                Ok(Redirect::see_other(ExemptRoute::CHANGE_PASSWORD_PATH).into_response())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{new_account, setup_test_app_data};
    use crate::types::internal::auth::Role;
    use poem::http::StatusCode;
    use poem::test::TestClient;
    use poem::{handler, EndpointExt, Route};

    #[handler]
    fn ok() -> &'static str {
        "ok"
    }

    fn app(app_data: Arc<AppData>) -> impl Endpoint {
        Route::new()
            .at("/api/evaluations", ok)
            .at("/api/auth/change-password", ok)
            .at("/api/auth/logout", ok)
            .with(FirstAccessGate::new(app_data))
    }

    async fn token_for(app_data: &AppData, first_access_completed: bool) -> String {
        let mut input = new_account("gate@example.com", Role::Supervisor, "Initial-password-1");
        input.first_access_completed = first_access_completed;
        let account = app_data.credential_store.create_account(&app_data.db, input).await.unwrap();
        let (token, _) = app_data.token_provider.generate_jwt(&account.id, Role::Supervisor).unwrap();
        token
    }

    #[tokio::test]
    async fn test_pending_account_is_redirected() {
        let (app_data, _mail) = setup_test_app_data().await;
        let token = token_for(&app_data, false).await;
        let cli = TestClient::new(app(app_data));

        let resp = cli
            .get("/api/evaluations")
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await;

        resp.assert_status(StatusCode::SEE_OTHER);
        resp.assert_header("Location", "/api/auth/change-password");
    }

    #[tokio::test]
    async fn test_pending_account_reaches_exempt_routes() {
        let (app_data, _mail) = setup_test_app_data().await;
        let token = token_for(&app_data, false).await;
        let cli = TestClient::new(app(app_data));

        for path in ["/api/auth/change-password", "/api/auth/logout"] {
            let resp = cli
                .get(path)
                .header("Authorization", format!("Bearer {}", token))
                .send()
                .await;
            resp.assert_status_is_ok();
        }
    }

    #[tokio::test]
    async fn test_completed_account_passes() {
        let (app_data, _mail) = setup_test_app_data().await;
        let token = token_for(&app_data, true).await;
        let cli = TestClient::new(app(app_data));

        let resp = cli
            .get("/api/evaluations")
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await;

        resp.assert_status_is_ok();
    }

    #[tokio::test]
    async fn test_unknown_or_invalid_principals_fail_open() {
        let (app_data, _mail) = setup_test_app_data().await;
        let (ghost_token, _) = app_data.token_provider.generate_jwt("no-such-account", Role::Supervisor).unwrap();
        let cli = TestClient::new(app(app_data));

        cli.get("/api/evaluations").send().await.assert_status_is_ok();
        cli.get("/api/evaluations")
            .header("Authorization", "Bearer not-a-jwt")
            .send()
            .await
            .assert_status_is_ok();
        cli.get("/api/evaluations")
            .header("Authorization", format!("Bearer {}", ghost_token))
            .send()
            .await
            .assert_status_is_ok();
    }
}
