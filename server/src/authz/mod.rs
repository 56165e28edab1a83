mod identity;
mod resolve;
mod scope;

pub mod facade;

pub use identity::{resolve_tenant_id, AccessToken, ClientRef};
pub use resolve::has_permission;
pub use scope::{
    member_belongs_to_team, team_belongs_to_workspace, validate_context,
    workspace_belongs_to_tenant,
};

use std::fmt::Display;

use thiserror::Error;

/// The kinds of entity a scope check can report as missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Workspace,
    Team,
    TeamMember,
    Permission,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Workspace => write!(f, "workspace"),
            EntityKind::Team => write!(f, "team"),
            EntityKind::TeamMember => write!(f, "team member"),
            EntityKind::Permission => write!(f, "permission"),
        }
    }
}

/// A typed authorization denial.
///
/// Structural scope mismatches are reported as `NotFound` so that an
/// entity belonging to another tenant is indistinguishable from a
/// nonexistent one; `Forbidden` is reserved for permission-based denials
/// on a structurally valid target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Denial {
    /// The access token carries no tenant identifier. A client-side
    /// configuration fault, distinct from both not-found and forbidden.
    #[error("tenant context missing from access token")]
    MissingContext,

    #[error("{0} not found")]
    NotFound(EntityKind),

    #[error("operation not allowed")]
    Forbidden,
}

/// Outcome of a pure authorization decision: allow, or a typed denial.
/// Denials are terminal for the current operation; internal store errors
/// travel separately as `anyhow::Error`.
pub type Decision = Result<(), Denial>;
