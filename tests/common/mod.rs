// Common test utilities for integration tests

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use estagiogo_backend::api;
use estagiogo_backend::config::{self, SecretManager};
use estagiogo_backend::providers::{EmailMessage, RecordingEmailSender};
use estagiogo_backend::stores::NewAccount;
use estagiogo_backend::types::internal::auth::Role;
use estagiogo_backend::AppData;
use poem::test::TestClient;
use poem::Endpoint;
use serde_json::json;

pub const JWT_SECRET: &str = "integration-jwt-secret-at-least-32-chars";
pub const PASSWORD_PEPPER: &str = "integration-pepper-16";
pub const TOKEN_SECRET: &str = "integration-token-secret-at-least-32-ch";

/// Migrated in-memory database wrapped in AppData, with a recording mailer
pub async fn setup_app_data() -> (Arc<AppData>, Arc<RecordingEmailSender>) {
    let db = config::connect("sqlite::memory:").await.expect("Failed to create test database");
    config::migrate(&db).await.expect("Failed to run migrations");

    let secret_manager = Arc::new(SecretManager::from_values(JWT_SECRET, PASSWORD_PEPPER, TOKEN_SECRET));
    let mail = Arc::new(RecordingEmailSender::new());
    let app_data = Arc::new(AppData::with_parts(db, secret_manager, mail.clone()));

    (app_data, mail)
}

pub fn client(app_data: Arc<AppData>) -> TestClient<impl Endpoint> {
    TestClient::new(api::build_app(app_data, "http://localhost:3000"))
}

/// Create an account directly in the store
pub async fn create_account(
    app_data: &AppData,
    email: &str,
    role: Role,
    password: &str,
    first_access_completed: bool,
) -> String {
    let account = app_data
        .credential_store
        .create_account(
            &app_data.db,
            NewAccount {
                email: email.to_string(),
                display_name: format!("{} account", role),
                role,
                password: password.to_string(),
                first_access_completed,
            },
        )
        .await
        .expect("Failed to create account");
    account.id
}

/// Log in over HTTP and return (access_token, refresh_token)
pub async fn login<E: Endpoint>(cli: &TestClient<E>, email: &str, password: &str) -> (String, String) {
    let resp = cli
        .post("/api/auth/login")
        .body_json(&json!({ "email": email, "password": password }))
        .send()
        .await;
    resp.assert_status_is_ok();

    let body = resp.json().await;
    let object = body.value().object();
    (
        object.get("access_token").string().to_string(),
        object.get("refresh_token").string().to_string(),
    )
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Wait for the fire-and-forget mailer to deliver to `to`
pub async fn wait_for_mail(mail: &RecordingEmailSender, to: &str) -> EmailMessage {
    for _ in 0..100 {
        if let Some(message) = mail.last_to(to) {
            return message;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("no email sent to {}", to);
}

/// Secret carried in an email's `<code>` element
pub fn secret_from(message: &EmailMessage) -> String {
    let start = message.html_body.find("<code>").expect("no <code> in email") + "<code>".len();
    let end = message.html_body.find("</code>").expect("no </code> in email");
    message.html_body[start..end]
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}
