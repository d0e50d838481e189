use std::sync::Arc;

use poem::Request;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::BearerAuth;
use crate::app_data::AppData;
use crate::coordinators::AuthCoordinator;
use crate::errors::AuthError;
use crate::types::dto::auth::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, LogoutRequest, RefreshRequest, RefreshResponse,
    ResetPasswordRequest, TokenResponse, WhoAmIResponse,
};
use crate::types::dto::common::MessageResponse;
use crate::types::internal::context::RequestContext;

/// Authentication API endpoints
pub struct AuthApi {
    auth_coordinator: Arc<AuthCoordinator>,
}

impl AuthApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            auth_coordinator: Arc::new(AuthCoordinator::new(app_data)),
        }
    }

    fn context(&self, req: &Request) -> RequestContext {
        RequestContext::from_request(req, &self.auth_coordinator.token_provider())
    }
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Authenticate with email and password
    ///
    /// Returns an access token (JWT) and refresh token for subsequent API requests.
    /// Access tokens expire after 15 minutes.
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, req: &Request, body: Json<LoginRequest>) -> Result<Json<TokenResponse>, AuthError> {
        let ctx = self.context(req);
        let pair = self.auth_coordinator.login(&ctx, &body.email, &body.password).await?;
        Ok(Json(pair.into()))
    }

    /// Get the signed-in account
    ///
    /// Reports whether the mandatory first password change is still pending.
    #[oai(path = "/whoami", method = "get", tag = "AuthTags::Authentication")]
    async fn whoami(&self, req: &Request, _auth: BearerAuth) -> Result<Json<WhoAmIResponse>, AuthError> {
        let ctx = self.context(req);
        let account = self.auth_coordinator.whoami(&ctx).await?;
        Ok(Json(account.into()))
    }

    /// Obtain a new access token
    #[oai(path = "/refresh", method = "post", tag = "AuthTags::Authentication")]
    async fn refresh(&self, req: &Request, body: Json<RefreshRequest>) -> Result<Json<RefreshResponse>, AuthError> {
        let ctx = self.context(req);
        let access_token = self.auth_coordinator.refresh(&ctx, &body.refresh_token).await?;
        Ok(Json(RefreshResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.auth_coordinator.token_provider().jwt_lifetime_seconds(),
        }))
    }

    /// Revoke a refresh token
    ///
    /// Always answers 200 so token validity is not revealed.
    #[oai(path = "/logout", method = "post", tag = "AuthTags::Authentication")]
    async fn logout(&self, req: &Request, body: Json<LogoutRequest>) -> Json<MessageResponse> {
        let ctx = self.context(req);
        if let Err(e) = self.auth_coordinator.logout(&ctx, &body.refresh_token).await {
            tracing::debug!(request_id = %ctx.request_id, "Logout ignored: {}", e);
        }
        Json(MessageResponse::new("Logged out successfully"))
    }

    /// Change the signed-in account's password
    ///
    /// Completes first access. All refresh tokens are revoked and a new token
    /// pair is issued.
    #[oai(path = "/change-password", method = "post", tag = "AuthTags::Authentication")]
    async fn change_password(
        &self,
        req: &Request,
        _auth: BearerAuth,
        body: Json<ChangePasswordRequest>,
    ) -> Result<Json<TokenResponse>, AuthError> {
        let ctx = self.context(req);
        let pair = self
            .auth_coordinator
            .change_password(&ctx, &body.current_password, &body.new_password)
            .await?;
        Ok(Json(pair.into()))
    }

    /// Request a password reset email
    ///
    /// Always answers 200 so account existence is not revealed.
    #[oai(path = "/forgot-password", method = "post", tag = "AuthTags::Authentication")]
    async fn forgot_password(
        &self,
        req: &Request,
        body: Json<ForgotPasswordRequest>,
    ) -> Result<Json<MessageResponse>, AuthError> {
        let ctx = self.context(req);
        self.auth_coordinator.forgot_password(&ctx, &body.email).await?;
        Ok(Json(MessageResponse::new(
            "If the email is registered, a reset link has been sent",
        )))
    }

    /// Set a new password with a reset token
    #[oai(path = "/reset-password", method = "post", tag = "AuthTags::Authentication")]
    async fn reset_password(
        &self,
        req: &Request,
        body: Json<ResetPasswordRequest>,
    ) -> Result<Json<MessageResponse>, AuthError> {
        let ctx = self.context(req);
        self.auth_coordinator
            .reset_password(&ctx, &body.token, &body.new_password)
            .await?;
        Ok(Json(MessageResponse::new("Password has been reset")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{new_account, setup_test_app_data};
    use crate::types::internal::auth::Role;
    use poem_openapi::auth::Bearer;

    const PASSWORD: &str = "Initial-password-1";

    async fn setup() -> (Arc<AppData>, AuthApi) {
        let (app_data, _mail) = setup_test_app_data().await;
        app_data
            .credential_store
            .create_account(&app_data.db, new_account("ana@example.com", Role::Supervisor, PASSWORD))
            .await
            .unwrap();
        let api = AuthApi::new(app_data.clone());
        (app_data, api)
    }

    fn bearer_request(token: &str) -> Request {
        Request::builder()
            .header("Authorization", format!("Bearer {}", token))
            .finish()
    }

    fn bearer(token: &str) -> BearerAuth {
        BearerAuth(Bearer { token: token.to_string() })
    }

    async fn login(api: &AuthApi, password: &str) -> Result<Json<TokenResponse>, AuthError> {
        let body = Json(LoginRequest {
            email: "ana@example.com".to_string(),
            password: password.to_string(),
        });
        api.login(&Request::builder().finish(), body).await
    }

    #[tokio::test]
    async fn test_login_returns_token_pair() {
        let (_app_data, api) = setup().await;

        let response = login(&api, PASSWORD).await.unwrap();

        assert!(!response.access_token.is_empty());
        assert!(!response.refresh_token.is_empty());
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 900);
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_is_unauthorized() {
        let (_app_data, api) = setup().await;

        match login(&api, "wrong-password").await {
            Err(AuthError::InvalidCredentials(_)) => {}
            other => panic!("expected InvalidCredentials, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_whoami_reports_pending_first_access() {
        let (_app_data, api) = setup().await;
        let tokens = login(&api, PASSWORD).await.unwrap();

        let me = api
            .whoami(&bearer_request(&tokens.access_token), bearer(&tokens.access_token))
            .await
            .unwrap();

        assert_eq!(me.email, "ana@example.com");
        assert_eq!(me.role, "Supervisor");
        assert!(!me.first_access_completed);
    }

    #[tokio::test]
    async fn test_change_password_completes_first_access() {
        let (_app_data, api) = setup().await;
        let tokens = login(&api, PASSWORD).await.unwrap();
        let req = bearer_request(&tokens.access_token);

        let new_tokens = api
            .change_password(
                &req,
                bearer(&tokens.access_token),
                Json(ChangePasswordRequest {
                    current_password: PASSWORD.to_string(),
                    new_password: "Brand-new-secret-9".to_string(),
                }),
            )
            .await
            .unwrap();

        let me = api
            .whoami(&bearer_request(&new_tokens.access_token), bearer(&new_tokens.access_token))
            .await
            .unwrap();
        assert!(me.first_access_completed);

        // Old refresh token was revoked
        let refreshed = api
            .refresh(
                &Request::builder().finish(),
                Json(RefreshRequest {
                    refresh_token: tokens.refresh_token.clone(),
                }),
            )
            .await;
        assert!(matches!(refreshed, Err(AuthError::InvalidRefreshToken(_))));
    }

    #[tokio::test]
    async fn test_change_password_rejects_weak_password() {
        let (_app_data, api) = setup().await;
        let tokens = login(&api, PASSWORD).await.unwrap();

        let result = api
            .change_password(
                &bearer_request(&tokens.access_token),
                bearer(&tokens.access_token),
                Json(ChangePasswordRequest {
                    current_password: PASSWORD.to_string(),
                    new_password: "short".to_string(),
                }),
            )
            .await;

        assert!(matches!(result, Err(AuthError::PasswordValidationFailed(_))));
    }

    #[tokio::test]
    async fn test_logout_always_succeeds() {
        let (_app_data, api) = setup().await;

        let response = api
            .logout(
                &Request::builder().finish(),
                Json(LogoutRequest {
                    refresh_token: "not-a-real-token".to_string(),
                }),
            )
            .await;

        assert_eq!(response.message, "Logged out successfully");
    }

    #[tokio::test]
    async fn test_forgot_password_unknown_email_succeeds() {
        let (_app_data, api) = setup().await;

        let result = api
            .forgot_password(
                &Request::builder().finish(),
                Json(ForgotPasswordRequest {
                    email: "nobody@example.com".to_string(),
                }),
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_reset_password_with_bad_token() {
        let (_app_data, api) = setup().await;

        let result = api
            .reset_password(
                &Request::builder().finish(),
                Json(ResetPasswordRequest {
                    token: "bogus".to_string(),
                    new_password: "Brand-new-secret-9".to_string(),
                }),
            )
            .await;

        assert!(matches!(result, Err(AuthError::InvalidResetToken(_))));
    }
}
