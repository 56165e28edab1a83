mod sql;
mod sqlite;

#[cfg(test)]
pub mod tests;

pub mod config;
pub mod slug;
pub mod types;

use std::cell::RefCell;
use std::sync::Mutex;

use anyhow::{bail, Result};
use teamgate_misc::api::member::{MemberStatus, TeamMember};
use teamgate_misc::api::permission::Permission;
use teamgate_misc::api::team::Team;
use teamgate_misc::api::workspace::Workspace;
use teamgate_misc::api::Query;

use sqlite::{Sqlite, SqliteTransaction};
use types::{Connection, PatchPermissionParams, PatchTeamParams, Transaction};

pub struct Database {
    conn: Mutex<RefCell<UnionConnection>>,
}

impl Database {
    pub fn new(conn: UnionConnection) -> Self {
        Self {
            conn: Mutex::new(RefCell::new(conn)),
        }
    }

    #[cfg(test)]
    pub fn new_test() -> Self {
        let conn = Sqlite::memory().unwrap();
        Self::new(UnionConnection::Sqlite(conn))
    }

    pub fn with_transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&dyn Transaction) -> Result<T>,
    {
        let conn = match self.conn.lock() {
            Ok(conn) => conn,
            Err(e) => bail!("failed to lock connection: {:#}", e),
        };
        let mut conn = conn.borrow_mut();
        let tx = conn.transaction()?;

        let result = f(&tx);

        if result.is_ok() {
            tx.commit()
        } else {
            tx.rollback()
        }?;

        result
    }
}

pub enum UnionConnection {
    Sqlite(Sqlite),
}

pub enum UnionTransaction<'a> {
    Sqlite(SqliteTransaction<'a>),
}

impl<'a> Connection<'a, UnionTransaction<'a>> for UnionConnection {
    fn transaction(&'a mut self) -> Result<UnionTransaction<'a>> {
        match self {
            UnionConnection::Sqlite(conn) => conn.transaction().map(UnionTransaction::Sqlite),
        }
    }
}

impl Transaction for UnionTransaction<'_> {
    fn create_workspace(&self, ws: &Workspace) -> Result<()> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.create_workspace(ws),
        }
    }

    fn get_workspace(&self, id: &str) -> Result<Option<Workspace>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.get_workspace(id),
        }
    }

    fn list_workspaces(&self, tenant_id: &str, query: Query) -> Result<Vec<Workspace>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.list_workspaces(tenant_id, query),
        }
    }

    fn count_workspaces(&self, tenant_id: &str, query: Query) -> Result<u64> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.count_workspaces(tenant_id, query),
        }
    }

    fn update_workspace(&self, id: &str, name: &str, update_time: u64) -> Result<()> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.update_workspace(id, name, update_time),
        }
    }

    fn delete_workspace(&self, id: &str) -> Result<()> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.delete_workspace(id),
        }
    }

    fn workspace_slug_exists(&self, tenant_id: &str, slug: &str) -> Result<bool> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.workspace_slug_exists(tenant_id, slug),
        }
    }

    fn create_team(&self, team: &Team) -> Result<()> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.create_team(team),
        }
    }

    fn get_team(&self, id: &str) -> Result<Option<Team>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.get_team(id),
        }
    }

    fn list_teams(&self, workspace_id: &str, query: Query) -> Result<Vec<Team>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.list_teams(workspace_id, query),
        }
    }

    fn count_teams(&self, workspace_id: &str, query: Query) -> Result<u64> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.count_teams(workspace_id, query),
        }
    }

    fn update_team(&self, patch: PatchTeamParams) -> Result<()> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.update_team(patch),
        }
    }

    fn delete_team(&self, id: &str) -> Result<()> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.delete_team(id),
        }
    }

    fn team_slug_exists(&self, workspace_id: &str, slug: &str) -> Result<bool> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.team_slug_exists(workspace_id, slug),
        }
    }

    fn sync_team_permissions(&self, team_id: &str, permission_ids: &[String]) -> Result<()> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.sync_team_permissions(team_id, permission_ids),
        }
    }

    fn list_team_permissions(&self, team_id: &str) -> Result<Vec<Permission>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.list_team_permissions(team_id),
        }
    }

    fn create_member(&self, member: &TeamMember) -> Result<()> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.create_member(member),
        }
    }

    fn get_member(&self, id: &str) -> Result<Option<TeamMember>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.get_member(id),
        }
    }

    fn list_members(&self, team_id: &str) -> Result<Vec<TeamMember>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.list_members(team_id),
        }
    }

    fn update_member_status(
        &self,
        id: &str,
        status: MemberStatus,
        update_time: u64,
    ) -> Result<()> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.update_member_status(id, status, update_time),
        }
    }

    fn activate_member(&self, member: &TeamMember, user_id: &str, update_time: u64) -> Result<()> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.activate_member(member, user_id, update_time),
        }
    }

    fn delete_member(&self, id: &str) -> Result<()> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.delete_member(id),
        }
    }

    fn create_permission(&self, permission: &Permission) -> Result<()> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.create_permission(permission),
        }
    }

    fn get_permission(&self, id: &str) -> Result<Option<Permission>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.get_permission(id),
        }
    }

    fn list_permissions(&self, tenant_id: &str, query: Query) -> Result<Vec<Permission>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.list_permissions(tenant_id, query),
        }
    }

    fn count_permissions(&self, tenant_id: &str, query: Query) -> Result<u64> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.count_permissions(tenant_id, query),
        }
    }

    fn update_permission(&self, patch: PatchPermissionParams) -> Result<()> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.update_permission(patch),
        }
    }

    fn delete_permission(&self, id: &str) -> Result<()> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.delete_permission(id),
        }
    }

    fn permission_slug_exists(&self, tenant_id: &str, slug: &str) -> Result<bool> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.permission_slug_exists(tenant_id, slug),
        }
    }

    fn user_has_team_permission(
        &self,
        workspace_id: &str,
        user_id: &str,
        slug: &str,
    ) -> Result<bool> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.user_has_team_permission(workspace_id, user_id, slug),
        }
    }

    fn commit(self) -> Result<()> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.commit(),
        }
    }

    fn rollback(self) -> Result<()> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.rollback(),
        }
    }
}
