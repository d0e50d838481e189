use crate::types::internal::access::{AccessState, ExemptRoute, GateDecision, Principal};

/// Decide whether a request may proceed past the first-access gate
///
/// Only an authenticated principal that still owes its first password change
/// is redirected, and never while it is on an exempt route.
pub fn decide(path: &str, principal: Principal) -> GateDecision {
    match principal {
        Principal::Anonymous => GateDecision::Allow,
        Principal::Authenticated(AccessState::Normal) => GateDecision::Allow,
        Principal::Authenticated(AccessState::PendingFirstAccess) => match ExemptRoute::from_path(path) {
            Some(_) => GateDecision::Allow,
            None => GateDecision::RedirectToChangePassword,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PENDING: Principal = Principal::Authenticated(AccessState::PendingFirstAccess);
    const NORMAL: Principal = Principal::Authenticated(AccessState::Normal);

    #[test]
    fn test_pending_account_is_redirected_from_regular_routes() {
        for path in ["/", "/api/evaluations", "/api/interns/123", "/api/auth/whoami"] {
            assert_eq!(decide(path, PENDING), GateDecision::RedirectToChangePassword, "{}", path);
        }
    }

    #[test]
    fn test_pending_account_reaches_exempt_routes() {
        assert_eq!(decide("/api/auth/change-password", PENDING), GateDecision::Allow);
        assert_eq!(decide("/api/auth/logout", PENDING), GateDecision::Allow);
        assert_eq!(decide("/api/auth/change-password/", PENDING), GateDecision::Allow);
    }

    #[test]
    fn test_exempt_matching_is_exact() {
        for path in [
            "/api/auth/change-password/extra",
            "/api/auth/change-password-now",
            "/other/api/auth/logout",
            "/API/AUTH/LOGOUT",
        ] {
            assert_eq!(decide(path, PENDING), GateDecision::RedirectToChangePassword, "{}", path);
        }
    }

    #[test]
    fn test_normal_account_is_never_redirected() {
        for path in ["/", "/api/evaluations", "/api/auth/change-password"] {
            assert_eq!(decide(path, NORMAL), GateDecision::Allow);
        }
    }

    #[test]
    fn test_anonymous_request_is_never_redirected() {
        assert_eq!(decide("/api/evaluations", Principal::Anonymous), GateDecision::Allow);
    }

    #[test]
    fn test_completed_password_change_releases_the_gate() {
        let before = Principal::Authenticated(AccessState::from_first_access_completed(false));
        let after = Principal::Authenticated(AccessState::from_first_access_completed(true));

        assert_eq!(decide("/api/interns", before), GateDecision::RedirectToChangePassword);
        assert_eq!(decide("/api/interns", after), GateDecision::Allow);
    }
}
