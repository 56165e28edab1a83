use anyhow::Result;
use teamgate_misc::api::member::{MemberStatus, TeamMember};
use teamgate_misc::api::permission::Permission;
use teamgate_misc::api::team::Team;
use teamgate_misc::api::workspace::Workspace;
use teamgate_misc::api::Query;
use thiserror::Error;

/// Input shape or uniqueness violation, surfaced adjacent to the
/// authorization core. Callers downcast this from `anyhow::Error` to map
/// it to a client error instead of a server error.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid {field}: {reason}")]
pub struct ValidationFailed {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationFailed {
    pub fn new(field: &'static str, reason: impl ToString) -> Self {
        Self {
            field,
            reason: reason.to_string(),
        }
    }
}

pub trait Connection<'a, T>
where
    T: Transaction + 'a,
{
    fn transaction(&'a mut self) -> Result<T>;
}

pub trait Transaction {
    fn create_workspace(&self, workspace: &Workspace) -> Result<()>;
    fn get_workspace(&self, id: &str) -> Result<Option<Workspace>>;
    fn list_workspaces(&self, tenant_id: &str, query: Query) -> Result<Vec<Workspace>>;
    fn count_workspaces(&self, tenant_id: &str, query: Query) -> Result<u64>;
    fn update_workspace(&self, id: &str, name: &str, update_time: u64) -> Result<()>;
    /// Deleting a workspace deletes its teams, their members and their
    /// permission links. The cascade is explicit, it does not rely on
    /// database triggers.
    fn delete_workspace(&self, id: &str) -> Result<()>;
    fn workspace_slug_exists(&self, tenant_id: &str, slug: &str) -> Result<bool>;

    fn create_team(&self, team: &Team) -> Result<()>;
    fn get_team(&self, id: &str) -> Result<Option<Team>>;
    fn list_teams(&self, workspace_id: &str, query: Query) -> Result<Vec<Team>>;
    fn count_teams(&self, workspace_id: &str, query: Query) -> Result<u64>;
    fn update_team(&self, patch: PatchTeamParams) -> Result<()>;
    /// Deletes the team along with its members and permission links.
    fn delete_team(&self, id: &str) -> Result<()>;
    fn team_slug_exists(&self, workspace_id: &str, slug: &str) -> Result<bool>;

    /// Replaces the team's permission set. Idempotent: repeating with the
    /// same set yields the same end state.
    fn sync_team_permissions(&self, team_id: &str, permission_ids: &[String]) -> Result<()>;
    fn list_team_permissions(&self, team_id: &str) -> Result<Vec<Permission>>;

    /// Enforces the membership invariants: exactly one of user id/email,
    /// no duplicate `(team_id, user_id)` or `(team_id, email)` pair.
    /// Violations surface as [`ValidationFailed`].
    fn create_member(&self, member: &TeamMember) -> Result<()>;
    fn get_member(&self, id: &str) -> Result<Option<TeamMember>>;
    fn list_members(&self, team_id: &str) -> Result<Vec<TeamMember>>;
    fn update_member_status(&self, id: &str, status: MemberStatus, update_time: u64)
        -> Result<()>;
    /// Activates an invitation and binds it to the accepting user's id.
    /// Fails with [`ValidationFailed`] if that user already holds another
    /// membership in the team.
    fn activate_member(&self, member: &TeamMember, user_id: &str, update_time: u64) -> Result<()>;
    fn delete_member(&self, id: &str) -> Result<()>;

    fn create_permission(&self, permission: &Permission) -> Result<()>;
    fn get_permission(&self, id: &str) -> Result<Option<Permission>>;
    fn list_permissions(&self, tenant_id: &str, query: Query) -> Result<Vec<Permission>>;
    fn count_permissions(&self, tenant_id: &str, query: Query) -> Result<u64>;
    fn update_permission(&self, patch: PatchPermissionParams) -> Result<()>;
    /// Detaches the permission from every team before removing it.
    fn delete_permission(&self, id: &str) -> Result<()>;
    fn permission_slug_exists(&self, tenant_id: &str, slug: &str) -> Result<bool>;

    /// The query shape the permission resolution engine depends on: does
    /// the user hold an *active* membership in any team of the workspace
    /// whose permission set contains the slug?
    fn user_has_team_permission(
        &self,
        workspace_id: &str,
        user_id: &str,
        slug: &str,
    ) -> Result<bool>;

    fn commit(self) -> Result<()>
    where
        Self: Sized;
    fn rollback(self) -> Result<()>
    where
        Self: Sized;
}

#[derive(Debug, Default)]
pub struct PatchTeamParams {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub update_time: u64,
}

#[derive(Debug, Default)]
pub struct PatchPermissionParams {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub update_time: u64,
}
