// Account provisioning commands

use std::sync::Arc;

use crate::app_data::AppData;
use crate::coordinators::AdminCoordinator;
use crate::providers::PasswordPolicyProvider;
use crate::stores::NewAccount;
use crate::types::internal::auth::Role;
use crate::types::internal::context::RequestContext;

/// Create an account with an operator-chosen password
///
/// Used to seed the first Administrator. The password must satisfy the
/// password policy.
pub async fn create_account(
    app_data: &AppData,
    email: &str,
    display_name: &str,
    role: Role,
    password: &str,
    first_access_completed: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = RequestContext::for_cli("create_account");

    PasswordPolicyProvider::new()
        .validate(password, email, None)
        .map_err(|e| format!("Password rejected: {}", e))?;

    let account = app_data
        .credential_store
        .create_account(
            &app_data.db,
            NewAccount {
                email: email.to_string(),
                display_name: display_name.to_string(),
                role,
                password: password.to_string(),
                first_access_completed,
            },
        )
        .await?;

    tracing::info!(request_id = %ctx.request_id, actor = %ctx.actor_id, account_id = %account.id, "Account created from CLI");

    println!("✅ Account created");
    println!("   Email: {}", account.email);
    println!("   Role:  {}", account.role);
    println!("   ID:    {}", account.id);
    if !account.first_access_completed {
        println!("   The password must be changed on first login.");
    }

    Ok(())
}

/// Reset an account's password to a new temporary one
///
/// The temporary password is printed and emailed; the account is sent back
/// through first access.
pub async fn reset_password(app_data: Arc<AppData>, email: &str) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = RequestContext::for_cli("reset_password");
    let coordinator = AdminCoordinator::new(app_data);

    let account = coordinator.find_account_by_email(&ctx, email).await?;
    let provisioned = coordinator.reset_password(&ctx, &account.id).await?;

    println!("✅ Password reset for {}", provisioned.account.email);
    println!("   Temporary password: {}", provisioned.temporary_password);
    println!("   The password must be changed on next login.");

    Ok(())
}
