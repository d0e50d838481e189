use std::net::IpAddr;

use poem::Request;
use poem_openapi::auth::{Bearer, BearerAuthorization};

use crate::errors::internal::{CredentialError, InternalError};
use crate::providers::TokenProvider;
use crate::types::internal::auth::{Claims, Role};

use super::{request_id::RequestId, request_source::RequestSource};

/// Request context that flows through all layers
///
/// Contains contextual information about the current request that is needed
/// for logging and authorization across API, coordinator, and store layers.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// Unique identifier for this request (for tracing across layers)
    pub request_id: RequestId,

    /// Whether the request is authenticated (JWT validated successfully)
    pub authenticated: bool,

    /// Full JWT claims if authenticated
    pub claims: Option<Claims>,

    /// Source of the request (API, CLI, or System)
    pub source: RequestSource,

    /// Actor who initiated the operation
    pub actor_id: String,
}

impl RequestContext {
    /// Create an unauthenticated API context with a fresh request_id
    pub fn new() -> Self {
        Self {
            ip_address: None,
            request_id: RequestId::new(),
            authenticated: false,
            claims: None,
            source: RequestSource::API,
            actor_id: "unknown".to_owned(),
        }
    }

    /// Create a RequestContext for CLI operations
    pub fn for_cli(command_name: &str) -> Self {
        Self {
            source: RequestSource::CLI,
            actor_id: format!("cli:{}", command_name),
            ..Self::new()
        }
    }

    /// Create a RequestContext for system operations
    pub fn for_system(operation_name: &str) -> Self {
        Self {
            source: RequestSource::System,
            actor_id: format!("system:{}", operation_name),
            ..Self::new()
        }
    }

    /// Extract IP address from request headers
    ///
    /// Checks X-Forwarded-For, X-Real-IP, and falls back to remote address.
    pub fn extract_ip_address(req: &Request) -> Option<IpAddr> {
        // Check X-Forwarded-For header (proxy/load balancer)
        if let Some(forwarded) = req.header("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                return ip.trim().parse().ok();
            }
        }

        // Check X-Real-IP header (nginx)
        if let Some(real_ip) = req.header("X-Real-IP") {
            return real_ip.parse().ok();
        }

        // Fall back to remote address
        req.remote_addr().as_socket_addr().map(|addr| addr.ip())
    }

    pub fn extract_bearer(req: &Request) -> Option<Bearer> {
        Bearer::from_request(req).ok()
    }

    /// Create RequestContext from a request
    ///
    /// Populates the IP address and request_id, and if a bearer token is present
    /// and valid, the claims. An invalid token leaves the context unauthenticated;
    /// endpoints decide whether that is acceptable.
    pub fn from_request(req: &Request, token_provider: &TokenProvider) -> Self {
        let mut ctx = Self::new();
        ctx.ip_address = Self::extract_ip_address(req);

        if let Some(bearer) = Self::extract_bearer(req) {
            match token_provider.validate_jwt(&bearer.token) {
                Ok(claims) => {
                    let sub = claims.sub.clone();
                    ctx = ctx.with_auth(claims).with_actor_id(sub);
                }
                Err(e) => {
                    tracing::debug!("Bearer token rejected for request {}: {}", ctx.request_id, e);
                }
            }
        }

        tracing::trace!("Request context created: {:?}", ctx);

        ctx
    }

    /// Set the ip_address
    pub fn with_ip_address(mut self, ip_address: IpAddr) -> Self {
        self.ip_address = Some(ip_address);
        self
    }

    /// Set authentication state with claims
    pub fn with_auth(mut self, claims: Claims) -> Self {
        self.authenticated = true;
        self.claims = Some(claims);
        self
    }

    /// Set the actor_id
    pub fn with_actor_id(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = actor_id.into();
        self
    }

    /// Claims of the authenticated caller, or `InvalidToken` when anonymous
    pub fn require_claims(&self) -> Result<&Claims, InternalError> {
        self.claims
            .as_ref()
            .filter(|_| self.authenticated)
            .ok_or_else(|| InternalError::from(CredentialError::invalid_token("jwt", "missing or invalid bearer token")))
    }

    /// Role of the authenticated caller
    pub fn role(&self) -> Option<Role> {
        self.claims.as_ref().map(|claims| claims.role)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role) -> Claims {
        Claims {
            sub: "account-1".to_string(),
            role,
            exp: 0,
            iat: 0,
            jti: "jti".to_string(),
        }
    }

    #[test]
    fn test_new_context_is_anonymous() {
        let ctx = RequestContext::new();
        assert!(!ctx.authenticated);
        assert!(ctx.require_claims().is_err());
        assert_eq!(ctx.role(), None);
    }

    #[test]
    fn test_with_auth_sets_claims() {
        let ctx = RequestContext::new()
            .with_auth(claims(Role::Supervisor))
            .with_actor_id("account-1");

        assert!(ctx.authenticated);
        assert_eq!(ctx.actor_id, "account-1");
        assert_eq!(ctx.role(), Some(Role::Supervisor));
        assert_eq!(ctx.require_claims().unwrap().sub, "account-1");
    }

    #[test]
    fn test_cli_context_actor() {
        let ctx = RequestContext::for_cli("create-account");
        assert_eq!(ctx.source, RequestSource::CLI);
        assert_eq!(ctx.actor_id, "cli:create-account");
    }
}
