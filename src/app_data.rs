use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::{EnvironmentProvider, SecretManager};
use crate::errors::InternalError;
use crate::providers::{EmailSender, LoggingEmailSender, TokenProvider};
use crate::stores::{CredentialStore, EvaluationStore, ProgramStore};

/// Centralized application data following the main-owned stores pattern
///
/// All dependencies are created once in main.rs and shared across coordinators
/// and the first-access gate.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init()
///   ↓ creates once
///   ├─ db (DatabaseConnection)
///   ├─ secret_manager (Arc<SecretManager>)
///   ├─ credential_store (Arc<CredentialStore>)
///   ├─ program_store / evaluation_store
///   ├─ token_provider (Arc<TokenProvider>)
///   └─ email_sender (Arc<dyn EmailSender>)
///   ↓ wrapped in Arc<AppData>
///   ├─ AuthCoordinator / AdminCoordinator
///   ├─ ProgramCoordinator / EvaluationCoordinator
///   └─ FirstAccessGate
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub secret_manager: Arc<SecretManager>,
    pub credential_store: Arc<CredentialStore>,
    pub program_store: Arc<ProgramStore>,
    pub evaluation_store: Arc<EvaluationStore>,
    pub token_provider: Arc<TokenProvider>,
    pub email_sender: Arc<dyn EmailSender>,
}

impl AppData {
    /// Initialize all application data with the logging email sender
    ///
    /// The database should be connected and migrated before calling this.
    ///
    /// # Errors
    ///
    /// Returns `InternalError` when secret manager initialization fails
    pub fn init(db: DatabaseConnection, env: &dyn EnvironmentProvider) -> Result<Self, InternalError> {
        tracing::info!("Initializing AppData...");

        tracing::debug!("Initializing secret manager...");
        let secret_manager = Arc::new(
            SecretManager::init(env)
                .map_err(|e| InternalError::parse("secret_manager", format!("Secret manager init failed: {}", e)))?,
        );
        tracing::debug!("Secret manager initialized");

        let app_data = Self::with_parts(db, secret_manager, Arc::new(LoggingEmailSender));

        tracing::info!("AppData initialization complete");

        Ok(app_data)
    }

    /// Assemble AppData from already-built parts
    pub fn with_parts(
        db: DatabaseConnection,
        secret_manager: Arc<SecretManager>,
        email_sender: Arc<dyn EmailSender>,
    ) -> Self {
        let credential_store = Arc::new(CredentialStore::new(
            db.clone(),
            secret_manager.password_pepper().to_string(),
        ));
        let token_provider = Arc::new(TokenProvider::new(secret_manager.clone()));

        Self {
            db,
            secret_manager,
            credential_store,
            program_store: Arc::new(ProgramStore::new()),
            evaluation_store: Arc::new(EvaluationStore::new()),
            token_provider,
            email_sender,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    #[test]
    fn test_init_fails_without_secrets() {
        let result = AppData::init(DatabaseConnection::Disconnected, &MockEnvironment::empty());

        assert!(matches!(result, Err(InternalError::Parse { .. })));
    }

    #[test]
    fn test_init_with_secrets() {
        let env = MockEnvironment::empty().with_vars(&[
            ("JWT_SECRET", "test-secret-key-minimum-32-characters-long"),
            ("PASSWORD_PEPPER", "test-pepper-for-unit-tests"),
            ("TOKEN_SECRET", "test-token-secret-minimum-32-chars!"),
        ]);

        let app_data = AppData::init(DatabaseConnection::Disconnected, &env).unwrap();

        assert_eq!(app_data.secret_manager.password_pepper(), "test-pepper-for-unit-tests");
    }
}
