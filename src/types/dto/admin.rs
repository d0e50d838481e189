use poem_openapi::Object;

use crate::coordinators::admin_coordinator::ProvisionedAccount;
use crate::types::internal::auth::Role;

/// Request to provision a new account
#[derive(Object, Debug)]
pub struct CreateAccountRequest {
    pub email: String,
    pub display_name: String,
    pub role: Role,
}

/// Account provisioned or reset by an administrator
///
/// The temporary password is only sent by email.
#[derive(Object, Debug)]
pub struct AccountResponse {
    pub account_id: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub first_access_completed: bool,
}

impl From<ProvisionedAccount> for AccountResponse {
    fn from(provisioned: ProvisionedAccount) -> Self {
        let account = provisioned.account;
        Self {
            account_id: account.id,
            email: account.email,
            display_name: account.display_name,
            role: account.role,
            first_access_completed: account.first_access_completed,
        }
    }
}
