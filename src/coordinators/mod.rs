// Coordinators layer - Workflow orchestration
//
// Coordinators compose store and provider operations for specific API
// endpoints and CLI commands: authorization, transaction boundaries and
// logging live here, business rules live in providers.

pub mod admin_coordinator;
pub mod auth_coordinator;
pub mod evaluation_coordinator;
pub mod program_coordinator;

pub use admin_coordinator::AdminCoordinator;
pub use auth_coordinator::AuthCoordinator;
pub use evaluation_coordinator::EvaluationCoordinator;
pub use program_coordinator::ProgramCoordinator;

use crate::errors::InternalError;
use crate::types::internal::auth::Role;
use crate::types::internal::context::RequestContext;

/// Require an authenticated caller whose role satisfies `allowed`
pub(crate) fn require_role(
    ctx: &RequestContext,
    allowed: fn(&Role) -> bool,
    permission: &str,
) -> Result<Role, InternalError> {
    let role = ctx.require_claims()?.role;
    if !allowed(&role) {
        tracing::warn!(request_id = %ctx.request_id, actor = %ctx.actor_id, role = %role, "Denied: {}", permission);
        return Err(InternalError::forbidden(permission));
    }
    Ok(role)
}
