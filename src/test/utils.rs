// Test utilities shared across unit tests
// Only compiled when running tests

use std::sync::Arc;

use sea_orm::{Database, DatabaseConnection};
use migration::{Migrator, MigratorTrait};
use uuid::Uuid;

use crate::app_data::AppData;
use crate::config::SecretManager;
use crate::providers::RecordingEmailSender;
use crate::stores::{CredentialStore, NewAccount, NewCompetency, NewIntern, ProgramStore};
use crate::types::internal::auth::Role;
use crate::types::internal::context::RequestContext;

pub const TEST_JWT_SECRET: &str = "test-secret-key-minimum-32-characters-long";
pub const TEST_PASSWORD_PEPPER: &str = "test-pepper-for-unit-tests";
pub const TEST_TOKEN_SECRET: &str = "test-token-secret-minimum-32-chars!";

/// Creates an in-memory database with all migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Creates a test database and credential store
///
/// Callers can discard what they don't need:
/// ```rust
/// let (db, credential_store) = setup_test_stores().await;
/// let (db, _credential_store) = setup_test_stores().await;
/// ```
pub async fn setup_test_stores() -> (DatabaseConnection, Arc<CredentialStore>) {
    let db = setup_test_db().await;
    let credential_store = Arc::new(CredentialStore::new(db.clone(), TEST_PASSWORD_PEPPER.to_string()));
    (db, credential_store)
}

pub fn test_secret_manager() -> Arc<SecretManager> {
    Arc::new(SecretManager::from_values(
        TEST_JWT_SECRET,
        TEST_PASSWORD_PEPPER,
        TEST_TOKEN_SECRET,
    ))
}

/// Creates AppData over a fresh database with a recording email sender
pub async fn setup_test_app_data() -> (Arc<AppData>, Arc<RecordingEmailSender>) {
    let db = setup_test_db().await;
    let email_sender = Arc::new(RecordingEmailSender::new());
    let app_data = Arc::new(AppData::with_parts(db, test_secret_manager(), email_sender.clone()));
    (app_data, email_sender)
}

pub fn new_account(email: &str, role: Role, password: &str) -> NewAccount {
    NewAccount {
        email: email.to_string(),
        display_name: "Test Account".to_string(),
        role,
        password: password.to_string(),
        first_access_completed: false,
    }
}

/// Create an account that has already completed first access and a context signed in as it
pub async fn signed_in(app_data: &AppData, email: &str, role: Role) -> RequestContext {
    let mut input = new_account(email, role, "initial-password-1");
    input.first_access_completed = true;
    let account = app_data
        .credential_store
        .create_account(&app_data.db, input)
        .await
        .expect("Failed to create account");
    context_for(app_data, &account.id, role)
}

/// Authenticated context for an existing account
pub fn context_for(app_data: &AppData, account_id: &str, role: Role) -> RequestContext {
    let (token, _jti) = app_data
        .token_provider
        .generate_jwt(account_id, role)
        .expect("Failed to generate JWT");
    let claims = app_data.token_provider.validate_jwt(&token).expect("Failed to validate JWT");
    RequestContext::new().with_auth(claims).with_actor_id(account_id)
}

pub fn new_intern(email: &str) -> NewIntern {
    NewIntern {
        full_name: "João Pereira".to_string(),
        email: email.to_string(),
        institution: "Universidade Federal".to_string(),
        course: "Computer Science".to_string(),
        supervisor_id: None,
        active: true,
    }
}

/// Create active competencies under a fresh category and return their ids
pub async fn seed_competencies(db: &DatabaseConnection, names: &[&str]) -> Vec<String> {
    let store = ProgramStore::new();
    let category = store
        .create_category(db, &format!("Category {}", Uuid::new_v4()))
        .await
        .expect("Failed to create category");

    let mut ids = Vec::new();
    for name in names {
        let competency = store
            .create_competency(
                db,
                NewCompetency {
                    category_id: category.id.clone(),
                    name: name.to_string(),
                    description: None,
                    active: true,
                },
            )
            .await
            .expect("Failed to create competency");
        ids.push(competency.id);
    }
    ids
}
