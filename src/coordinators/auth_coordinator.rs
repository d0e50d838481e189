use std::sync::Arc;

use sea_orm::{ConnectionTrait, DatabaseConnection};

use crate::app_data::AppData;
use crate::errors::internal::CredentialError;
use crate::errors::InternalError;
use crate::providers::email_provider::{self, EmailMessage, EmailSender};
use crate::providers::{PasswordPolicyError, PasswordPolicyProvider, TokenProvider};
use crate::stores::credential_store::account_role;
use crate::stores::CredentialStore;
use crate::types::db::account;
use crate::types::internal::auth::TokenPair;
use crate::types::internal::context::RequestContext;

/// Authentication coordinator that orchestrates login, token refresh, logout,
/// password change and password reset workflows
pub struct AuthCoordinator {
    db: DatabaseConnection,
    credential_store: Arc<CredentialStore>,
    token_provider: Arc<TokenProvider>,
    password_policy: PasswordPolicyProvider,
    email_sender: Arc<dyn EmailSender>,
}

impl AuthCoordinator {
    /// Create AuthCoordinator from AppData
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            credential_store: app_data.credential_store.clone(),
            token_provider: app_data.token_provider.clone(),
            password_policy: PasswordPolicyProvider::new(),
            email_sender: app_data.email_sender.clone(),
        }
    }

    /// Get a reference to the internal TokenProvider
    ///
    /// Useful for API layer that needs direct access to token validation
    pub fn token_provider(&self) -> Arc<TokenProvider> {
        self.token_provider.clone()
    }

    /// Issue an access token and a stored refresh token for an account
    async fn issue_tokens(
        &self,
        conn: &impl ConnectionTrait,
        account: &account::Model,
    ) -> Result<TokenPair, InternalError> {
        let role = account_role(account)?;
        let (access_token, _jwt_id) = self.token_provider.generate_jwt(&account.id, role)?;

        let refresh_token = self.token_provider.generate_refresh_token();
        let token_hash = self.token_provider.hash_token(&refresh_token)?;
        let expires_at = self.token_provider.refresh_expiration();

        self.credential_store
            .store_refresh_token(conn, &account.id, &token_hash, expires_at)
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.token_provider.jwt_lifetime_seconds(),
        })
    }

    /// Orchestrate a complete login workflow
    ///
    /// 1. Verify credentials (locked out accounts are rejected)
    /// 2. Generate JWT and refresh token
    /// 3. Store refresh token
    pub async fn login(&self, ctx: &RequestContext, email: &str, password: &str) -> Result<TokenPair, InternalError> {
        let account = match self.credential_store.verify_credentials(email, password).await {
            Ok(account) => account,
            Err(e) => {
                tracing::warn!(request_id = %ctx.request_id, ip = ?ctx.ip_address, "Login failed: {}", e);
                return Err(e);
            }
        };

        let tokens = self.issue_tokens(&self.db, &account).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            account_id = %account.id,
            first_access_completed = account.first_access_completed,
            "Login succeeded"
        );

        Ok(tokens)
    }

    /// Exchange a refresh token for a new access token
    pub async fn refresh(&self, ctx: &RequestContext, refresh_token: &str) -> Result<String, InternalError> {
        let token_hash = self.token_provider.hash_token(refresh_token)?;

        let account_id = self.credential_store.validate_refresh_token(&self.db, &token_hash).await?;
        let account = self.credential_store.get_account_by_id(&self.db, &account_id).await?;

        if account.locked_out {
            return Err(CredentialError::LockedOut { account_id }.into());
        }

        let (access_token, _jwt_id) = self.token_provider.generate_jwt(&account.id, account_role(&account)?)?;

        tracing::debug!(request_id = %ctx.request_id, account_id = %account.id, "Access token refreshed");

        Ok(access_token)
    }

    /// Revoke a refresh token
    ///
    /// The refresh token itself is the authority; authentication only improves
    /// the log line.
    pub async fn logout(&self, ctx: &RequestContext, refresh_token: &str) -> Result<(), InternalError> {
        let token_hash = self.token_provider.hash_token(refresh_token)?;

        if !ctx.authenticated {
            tracing::warn!("Unauthenticated logout from IP: {:?}", ctx.ip_address);
        }

        let account_id = self.credential_store.revoke_refresh_token(&self.db, &token_hash).await?;

        tracing::info!(request_id = %ctx.request_id, account_id = %account_id, "Logged out");

        Ok(())
    }

    /// Current state of the signed-in account, read from the store
    pub async fn whoami(&self, ctx: &RequestContext) -> Result<account::Model, InternalError> {
        let claims = ctx.require_claims()?;
        self.credential_store.get_account_by_id(&self.db, &claims.sub).await
    }

    /// Orchestrate password change workflow
    ///
    /// Coordinates the sequence of operations within a transaction:
    /// 1. Verify current password
    /// 2. Validate new password against the password policy
    /// 3. Update password and mark first access completed
    /// 4. Revoke all refresh tokens
    /// 5. Issue and store a new token pair
    /// 6. Commit
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        current_password: &str,
        new_password: &str,
    ) -> Result<TokenPair, InternalError> {
        let account_id = ctx.require_claims()?.sub.clone();

        let account = self.credential_store.get_account_by_id(&self.db, &account_id).await?;
        if !self.credential_store.password_matches(&account, current_password)? {
            tracing::warn!(request_id = %ctx.request_id, account_id = %account_id, "Password change with wrong current password");
            return Err(CredentialError::IncorrectPassword.into());
        }

        self.password_policy
            .validate(new_password, &account.email, Some(current_password))
            .map_err(|e| CredentialError::PasswordValidationFailed(e.to_string()))?;

        let txn = self.credential_store.begin_transaction("password_change").await?;

        let updated = self
            .credential_store
            .complete_password_change_in_txn(&txn, &account_id, new_password)
            .await?;
        self.credential_store.revoke_all_refresh_tokens(&txn, &account_id).await?;
        let tokens = self.issue_tokens(&txn, &updated).await?;

        txn.commit().await.map_err(InternalError::transaction_commit)?;

        tracing::info!(request_id = %ctx.request_id, account_id = %account_id, "Password changed");

        Ok(tokens)
    }

    fn check_reset_password(&self, account: &account::Model, new_password: &str) -> Result<(), InternalError> {
        self.password_policy
            .validate(new_password, &account.email, None)
            .map_err(|e| CredentialError::PasswordValidationFailed(e.to_string()))?;

        if self.credential_store.password_matches(account, new_password)? {
            return Err(CredentialError::PasswordValidationFailed(
                PasswordPolicyError::SameAsCurrent.to_string(),
            )
            .into());
        }

        Ok(())
    }

    /// Start a self-service password reset
    ///
    /// Succeeds whether or not the email belongs to an account, so callers
    /// cannot probe for registered addresses.
    pub async fn forgot_password(&self, ctx: &RequestContext, email: &str) -> Result<(), InternalError> {
        let Some(account) = self.credential_store.find_account_by_email(&self.db, email).await? else {
            tracing::info!(request_id = %ctx.request_id, "Password reset requested for unknown email");
            return Ok(());
        };

        let reset_token = self.token_provider.generate_reset_token();
        let token_hash = self.token_provider.hash_token(&reset_token)?;
        self.credential_store
            .store_reset_token(&self.db, &account.id, &token_hash, self.token_provider.reset_expiration())
            .await?;

        email_provider::dispatch(
            self.email_sender.clone(),
            EmailMessage::password_reset_requested(&account.email, &account.display_name, &reset_token),
        );

        tracing::info!(request_id = %ctx.request_id, account_id = %account.id, "Password reset token issued");

        Ok(())
    }

    /// Complete a self-service password reset
    ///
    /// The token is consumed in the same transaction as the password change, so
    /// a rejected new password leaves the token usable. An expired token is
    /// removed even though the reset fails.
    pub async fn reset_password(
        &self,
        ctx: &RequestContext,
        reset_token: &str,
        new_password: &str,
    ) -> Result<(), InternalError> {
        let token_hash = self.token_provider.hash_token(reset_token)?;

        let txn = self.credential_store.begin_transaction("password_reset").await?;

        let account_id = match self.credential_store.consume_reset_token(&txn, &token_hash).await {
            Ok(account_id) => account_id,
            Err(e @ InternalError::Credential(CredentialError::ExpiredToken(_))) => {
                // The expired token's delete must outlive the failed reset
                txn.commit().await.map_err(InternalError::transaction_commit)?;
                tracing::info!(request_id = %ctx.request_id, "Expired reset token presented and removed");
                return Err(e);
            }
            Err(e) => return Err(e),
        };
        let account = self.credential_store.get_account_by_id(&txn, &account_id).await?;

        if let Err(e) = self.check_reset_password(&account, new_password) {
            txn.rollback()
                .await
                .map_err(|e| InternalError::database("rollback_password_reset", e))?;
            return Err(e);
        }

        self.credential_store
            .complete_password_change_in_txn(&txn, &account_id, new_password)
            .await?;
        self.credential_store.revoke_all_refresh_tokens(&txn, &account_id).await?;

        txn.commit().await.map_err(InternalError::transaction_commit)?;

        tracing::info!(request_id = %ctx.request_id, account_id = %account_id, "Password reset completed");

        Ok(())
    }
}
