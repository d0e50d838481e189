mod common;

use estagiogo_backend::types::internal::auth::Role;
use poem::http::StatusCode;
use serde_json::json;

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "Admin-secret-2025";

#[tokio::test]
async fn test_provisioned_account_must_change_password_first() {
    let (app_data, mail) = common::setup_app_data().await;
    common::create_account(&app_data, ADMIN_EMAIL, Role::Administrator, ADMIN_PASSWORD, true).await;
    let cli = common::client(app_data.clone());
    let (admin_token, _) = common::login(&cli, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    // Administrator provisions a supervisor
    let resp = cli
        .post("/api/admin/accounts")
        .header("Authorization", common::bearer(&admin_token))
        .body_json(&json!({
            "email": "carla@example.com",
            "display_name": "Carla Mendes",
            "role": "Supervisor"
        }))
        .send()
        .await;
    resp.assert_status_is_ok();
    let body = resp.json().await;
    body.value().object().get("first_access_completed").assert_bool(false);

    let temporary_password = common::secret_from(&common::wait_for_mail(&mail, "carla@example.com").await);
    let (token, _) = common::login(&cli, "carla@example.com", &temporary_password).await;

    // Every regular route redirects until the password is changed
    for path in ["/api/categories", "/api/auth/whoami", "/api/competencies"] {
        let resp = cli.get(path).header("Authorization", common::bearer(&token)).send().await;
        resp.assert_status(StatusCode::SEE_OTHER);
        resp.assert_header("Location", "/api/auth/change-password");
    }

    // Nested paths under an exempt route are not exempt
    let resp = cli
        .post("/api/auth/change-password/extra")
        .header("Authorization", common::bearer(&token))
        .send()
        .await;
    resp.assert_status(StatusCode::SEE_OTHER);

    let resp = cli
        .post("/api/auth/change-password")
        .header("Authorization", common::bearer(&token))
        .body_json(&json!({
            "current_password": temporary_password,
            "new_password": "Chosen-by-Supervisor-42"
        }))
        .send()
        .await;
    resp.assert_status_is_ok();
    let body = resp.json().await;
    let new_token = body.value().object().get("access_token").string().to_string();

    let resp = cli
        .get("/api/auth/whoami")
        .header("Authorization", common::bearer(&new_token))
        .send()
        .await;
    resp.assert_status_is_ok();
    resp.json().await.value().object().get("first_access_completed").assert_bool(true);

    // The old access token is still a valid JWT and is no longer gated either
    cli.get("/api/categories")
        .header("Authorization", common::bearer(&token))
        .send()
        .await
        .assert_status_is_ok();

    // A later password change does not re-trigger gating
    let resp = cli
        .post("/api/auth/change-password")
        .header("Authorization", common::bearer(&new_token))
        .body_json(&json!({
            "current_password": "Chosen-by-Supervisor-42",
            "new_password": "Second-choice-77"
        }))
        .send()
        .await;
    resp.assert_status_is_ok();
    let account = app_data
        .credential_store
        .find_account_by_email(&app_data.db, "carla@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(account.first_access_completed);
}

#[tokio::test]
async fn test_logout_is_reachable_while_pending() {
    let (app_data, _mail) = common::setup_app_data().await;
    common::create_account(&app_data, "new@example.com", Role::Intern, "Temporary-pass-1", false).await;
    let cli = common::client(app_data);
    let (token, refresh_token) = common::login(&cli, "new@example.com", "Temporary-pass-1").await;

    let resp = cli
        .post("/api/auth/logout")
        .header("Authorization", common::bearer(&token))
        .body_json(&json!({ "refresh_token": refresh_token }))
        .send()
        .await;
    resp.assert_status_is_ok();

    let resp = cli
        .post("/api/auth/refresh")
        .body_json(&json!({ "refresh_token": refresh_token }))
        .send()
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_administrator_reset_reenters_gate() {
    let (app_data, mail) = common::setup_app_data().await;
    common::create_account(&app_data, ADMIN_EMAIL, Role::Administrator, ADMIN_PASSWORD, true).await;
    let supervisor_id =
        common::create_account(&app_data, "sup@example.com", Role::Supervisor, "Supervisor-pass-9", true).await;
    let cli = common::client(app_data);

    let (supervisor_token, _) = common::login(&cli, "sup@example.com", "Supervisor-pass-9").await;
    cli.get("/api/categories")
        .header("Authorization", common::bearer(&supervisor_token))
        .send()
        .await
        .assert_status_is_ok();

    let (admin_token, _) = common::login(&cli, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let resp = cli
        .post(format!("/api/admin/accounts/{}/reset-password", supervisor_id))
        .header("Authorization", common::bearer(&admin_token))
        .send()
        .await;
    resp.assert_status_is_ok();

    let resp = cli
        .get("/api/categories")
        .header("Authorization", common::bearer(&supervisor_token))
        .send()
        .await;
    resp.assert_status(StatusCode::SEE_OTHER);

    let temporary_password = common::secret_from(&common::wait_for_mail(&mail, "sup@example.com").await);
    common::login(&cli, "sup@example.com", &temporary_password).await;
}

#[tokio::test]
async fn test_non_administrator_cannot_provision() {
    let (app_data, _mail) = common::setup_app_data().await;
    common::create_account(&app_data, "coord@example.com", Role::Coordinator, "Coordinator-pass-1", true).await;
    let cli = common::client(app_data);
    let (token, _) = common::login(&cli, "coord@example.com", "Coordinator-pass-1").await;

    let resp = cli
        .post("/api/admin/accounts")
        .header("Authorization", common::bearer(&token))
        .body_json(&json!({
            "email": "x@example.com",
            "display_name": "X",
            "role": "Intern"
        }))
        .send()
        .await;

    resp.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_anonymous_requests_are_not_redirected() {
    let (app_data, _mail) = common::setup_app_data().await;
    let cli = common::client(app_data);

    cli.get("/api/health").send().await.assert_status_is_ok();
    cli.get("/api/categories").send().await.assert_status(StatusCode::UNAUTHORIZED);
}
