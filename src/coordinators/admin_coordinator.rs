use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::errors::internal::CredentialError;
use crate::errors::InternalError;
use crate::providers::crypto_provider;
use crate::providers::email_provider::{self, EmailMessage, EmailSender};
use crate::stores::{CredentialStore, NewAccount};
use crate::types::db::account;
use crate::types::internal::auth::Role;
use crate::types::internal::context::{RequestContext, RequestSource};

/// Admin coordinator that orchestrates account provisioning and administrator resets
pub struct AdminCoordinator {
    db: DatabaseConnection,
    credential_store: Arc<CredentialStore>,
    email_sender: Arc<dyn EmailSender>,
}

/// Account created or reset by an administrator, with the temporary password
/// that was emailed to its owner
#[derive(Clone)]
pub struct ProvisionedAccount {
    pub account: account::Model,
    pub temporary_password: String,
}

impl std::fmt::Debug for ProvisionedAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvisionedAccount")
            .field("account_id", &self.account.id)
            .field("temporary_password", &"<redacted>")
            .finish()
    }
}

impl AdminCoordinator {
    /// Create AdminCoordinator from AppData
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            credential_store: app_data.credential_store.clone(),
            email_sender: app_data.email_sender.clone(),
        }
    }

    /// CLI operators act as administrators; API callers need the Administrator role
    fn require_administrator(ctx: &RequestContext) -> Result<(), InternalError> {
        if ctx.source == RequestSource::CLI {
            return Ok(());
        }

        let claims = ctx.require_claims()?;
        if claims.role != Role::Administrator {
            tracing::warn!(request_id = %ctx.request_id, actor = %ctx.actor_id, role = %claims.role, "Admin operation denied");
            return Err(InternalError::forbidden("administrator role required"));
        }

        Ok(())
    }

    fn validate_new_account(email: &str, display_name: &str) -> Result<(), InternalError> {
        let email = email.trim();
        let valid_email = match email.split_once('@') {
            Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
            None => false,
        };
        if !valid_email {
            return Err(CredentialError::invalid_field("email", "must be an email address").into());
        }

        if display_name.trim().is_empty() {
            return Err(CredentialError::invalid_field("display_name", "must not be empty").into());
        }

        Ok(())
    }

    /// Orchestrate account provisioning
    ///
    /// 1. Check the caller is an administrator
    /// 2. Generate a temporary password
    /// 3. Create the account with first access pending
    /// 4. Email the credentials (fire-and-forget)
    pub async fn create_account(
        &self,
        ctx: &RequestContext,
        email: &str,
        display_name: &str,
        role: Role,
    ) -> Result<ProvisionedAccount, InternalError> {
        Self::require_administrator(ctx)?;
        Self::validate_new_account(email, display_name)?;

        let temporary_password = crypto_provider::generate_temporary_password();

        let account = self
            .credential_store
            .create_account(
                &self.db,
                NewAccount {
                    email: email.to_string(),
                    display_name: display_name.to_string(),
                    role,
                    password: temporary_password.clone(),
                    first_access_completed: false,
                },
            )
            .await?;

        email_provider::dispatch(
            self.email_sender.clone(),
            EmailMessage::account_created(&account.email, &account.display_name, &temporary_password),
        );

        tracing::info!(
            request_id = %ctx.request_id,
            actor = %ctx.actor_id,
            account_id = %account.id,
            "Account provisioned"
        );

        Ok(ProvisionedAccount {
            account,
            temporary_password,
        })
    }

    /// Orchestrate an administrator password reset
    ///
    /// Within one transaction the password is replaced with a temporary one, the
    /// account goes back to pending first access and every refresh token is
    /// revoked. The temporary password is then emailed.
    pub async fn reset_password(
        &self,
        ctx: &RequestContext,
        account_id: &str,
    ) -> Result<ProvisionedAccount, InternalError> {
        Self::require_administrator(ctx)?;

        let temporary_password = crypto_provider::generate_temporary_password();

        let txn = self.credential_store.begin_transaction("admin_password_reset").await?;
        let account = self
            .credential_store
            .require_first_access_in_txn(&txn, account_id, &temporary_password)
            .await?;
        self.credential_store.revoke_all_refresh_tokens(&txn, account_id).await?;
        txn.commit().await.map_err(InternalError::transaction_commit)?;

        email_provider::dispatch(
            self.email_sender.clone(),
            EmailMessage::password_reset_by_admin(&account.email, &account.display_name, &temporary_password),
        );

        tracing::info!(
            request_id = %ctx.request_id,
            actor = %ctx.actor_id,
            account_id = %account.id,
            "Password reset by administrator"
        );

        Ok(ProvisionedAccount {
            account,
            temporary_password,
        })
    }

    /// Look up an account by email, for operator tooling
    pub async fn find_account_by_email(
        &self,
        ctx: &RequestContext,
        email: &str,
    ) -> Result<account::Model, InternalError> {
        Self::require_administrator(ctx)?;

        self.credential_store
            .find_account_by_email(&self.db, email)
            .await?
            .ok_or_else(|| CredentialError::AccountNotFound(email.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{setup_test_app_data, signed_in};
    use chrono::Utc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_create_account_requires_administrator() {
        let (app_data, _mail) = setup_test_app_data().await;
        let coordinator = AdminCoordinator::new(app_data.clone());
        let coordinator_ctx = signed_in(&app_data, "coord@example.com", Role::Coordinator).await;

        let result = coordinator
            .create_account(&coordinator_ctx, "new@example.com", "New Person", Role::Intern)
            .await;

        assert!(matches!(result, Err(InternalError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_create_account_rejects_anonymous_caller() {
        let (app_data, _mail) = setup_test_app_data().await;
        let coordinator = AdminCoordinator::new(app_data);

        let result = coordinator
            .create_account(&RequestContext::new(), "new@example.com", "New Person", Role::Intern)
            .await;

        assert!(matches!(result, Err(InternalError::Credential(CredentialError::InvalidToken { .. }))));
    }

    #[tokio::test]
    async fn test_create_account_provisions_pending_account_and_emails_password() {
        let (app_data, mail) = setup_test_app_data().await;
        let coordinator = AdminCoordinator::new(app_data.clone());
        let admin_ctx = signed_in(&app_data, "admin@example.com", Role::Administrator).await;

        let provisioned = coordinator
            .create_account(&admin_ctx, "New@Example.com", "New Person", Role::Intern)
            .await
            .unwrap();

        assert_eq!(provisioned.account.email, "new@example.com");
        assert!(!provisioned.account.first_access_completed);
        assert!(app_data
            .credential_store
            .verify_credentials("new@example.com", &provisioned.temporary_password)
            .await
            .is_ok());

        tokio::time::sleep(Duration::from_millis(50)).await;
        let message = mail.last_to("new@example.com").unwrap();
        let escaped_password = provisioned.temporary_password.replace('&', "&amp;");
        assert!(message.html_body.contains(&format!("<code>{}</code>", escaped_password)));
    }

    #[tokio::test]
    async fn test_create_account_validates_fields() {
        let (app_data, _mail) = setup_test_app_data().await;
        let coordinator = AdminCoordinator::new(app_data.clone());
        let admin_ctx = signed_in(&app_data, "admin@example.com", Role::Administrator).await;

        for (email, name) in [("not-an-email", "Name"), ("a@b", "Name"), ("x@example.com", "  ")] {
            let result = coordinator.create_account(&admin_ctx, email, name, Role::Intern).await;
            assert!(
                matches!(result, Err(InternalError::Credential(CredentialError::InvalidField { .. }))),
                "{} / {:?}",
                email,
                name
            );
        }
    }

    #[tokio::test]
    async fn test_reset_password_returns_account_to_pending_first_access() {
        let (app_data, _mail) = setup_test_app_data().await;
        let coordinator = AdminCoordinator::new(app_data.clone());
        let admin_ctx = signed_in(&app_data, "admin@example.com", Role::Administrator).await;
        let user_ctx = signed_in(&app_data, "user@example.com", Role::Supervisor).await;
        let user_id = user_ctx.require_claims().unwrap().sub.clone();
        app_data
            .credential_store
            .store_refresh_token(&app_data.db, &user_id, "hash", Utc::now().timestamp() + 3600)
            .await
            .unwrap();

        let reset = coordinator.reset_password(&admin_ctx, &user_id).await.unwrap();

        assert!(!reset.account.first_access_completed);
        assert_eq!(
            app_data.credential_store.first_access_completed(&user_id).await.unwrap(),
            Some(false)
        );
        assert!(app_data
            .credential_store
            .validate_refresh_token(&app_data.db, "hash")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_reset_password_for_unknown_account() {
        let (app_data, _mail) = setup_test_app_data().await;
        let coordinator = AdminCoordinator::new(app_data.clone());
        let admin_ctx = signed_in(&app_data, "admin@example.com", Role::Administrator).await;

        let result = coordinator.reset_password(&admin_ctx, "missing").await;

        assert!(matches!(result, Err(InternalError::Credential(CredentialError::AccountNotFound(_)))));
    }

    #[tokio::test]
    async fn test_cli_context_acts_as_administrator() {
        let (app_data, _mail) = setup_test_app_data().await;
        let coordinator = AdminCoordinator::new(app_data);

        let result = coordinator
            .create_account(&RequestContext::for_cli("create-account"), "cli@example.com", "Cli User", Role::Coordinator)
            .await;

        assert!(result.is_ok());
    }
}
