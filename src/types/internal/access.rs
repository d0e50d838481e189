/// Routes that stay reachable while an account still owes its first password change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExemptRoute {
    ChangePassword,
    Logout,
}

impl ExemptRoute {
    pub const CHANGE_PASSWORD_PATH: &'static str = "/api/auth/change-password";
    pub const LOGOUT_PATH: &'static str = "/api/auth/logout";

    pub fn path(&self) -> &'static str {
        match self {
            ExemptRoute::ChangePassword => Self::CHANGE_PASSWORD_PATH,
            ExemptRoute::Logout => Self::LOGOUT_PATH,
        }
    }

    /// Resolve a request path to an exempt route
    ///
    /// Only exact matches count; a single trailing slash is ignored.
    pub fn from_path(path: &str) -> Option<Self> {
        let normalized = match path.strip_suffix('/') {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => path,
        };

        match normalized {
            Self::CHANGE_PASSWORD_PATH => Some(ExemptRoute::ChangePassword),
            Self::LOGOUT_PATH => Some(ExemptRoute::Logout),
            _ => None,
        }
    }
}

/// Per-request access state derived from the account's first-access flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessState {
    PendingFirstAccess,
    Normal,
}

impl AccessState {
    pub fn from_first_access_completed(first_access_completed: bool) -> Self {
        if first_access_completed {
            AccessState::Normal
        } else {
            AccessState::PendingFirstAccess
        }
    }
}

/// Principal as seen by the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Principal {
    /// No token, an invalid token, or an account that could not be found
    Anonymous,
    Authenticated(AccessState),
}

/// Outcome of the first-access gate for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    RedirectToChangePassword,
}
