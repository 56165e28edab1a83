mod member;
mod permission;
mod team;
mod workspace;

use std::path::Path;

use anyhow::Result;
use rusqlite::types::Value as DbValue;
use rusqlite::Connection as RawConnection;
use rusqlite::Transaction as RawTransaction;
use teamgate_misc::api::member::{MemberStatus, TeamMember};
use teamgate_misc::api::permission::Permission;
use teamgate_misc::api::team::Team;
use teamgate_misc::api::workspace::Workspace;
use teamgate_misc::api::{Query, Value};

use super::types::{Connection, PatchPermissionParams, PatchTeamParams, Transaction};

/// SQLite-based database implementation. The simplest store type,
/// suitable for single-node deployments. Supports both file-based and
/// in-memory databases.
pub struct Sqlite {
    conn: RawConnection,
}

pub struct SqliteTransaction<'a> {
    tx: RawTransaction<'a>,
}

impl Sqlite {
    /// Opens a SQLite database file, creating it and all required tables
    /// if they don't exist.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = RawConnection::open(path)?;
        Self::init_tables(&conn)?;
        Ok(Self { conn })
    }

    /// Creates a new in-memory database. Content is lost when the program
    /// exits; recommended for testing only.
    pub fn memory() -> Result<Self> {
        let conn = RawConnection::open_in_memory()?;
        Self::init_tables(&conn)?;
        Ok(Self { conn })
    }

    fn init_tables(db: &RawConnection) -> Result<()> {
        workspace::create_table(db)?;
        team::create_table(db)?;
        member::create_table(db)?;
        permission::create_table(db)?;
        Ok(())
    }
}

impl<'a> Connection<'a, SqliteTransaction<'a>> for Sqlite {
    fn transaction(&'a mut self) -> Result<SqliteTransaction<'a>> {
        let tx = self.conn.transaction()?;
        Ok(SqliteTransaction { tx })
    }
}

impl Transaction for SqliteTransaction<'_> {
    fn create_workspace(&self, ws: &Workspace) -> Result<()> {
        workspace::create(&self.tx, ws)
    }

    fn get_workspace(&self, id: &str) -> Result<Option<Workspace>> {
        workspace::get(&self.tx, id)
    }

    fn list_workspaces(&self, tenant_id: &str, query: Query) -> Result<Vec<Workspace>> {
        workspace::list(&self.tx, tenant_id, query)
    }

    fn count_workspaces(&self, tenant_id: &str, query: Query) -> Result<u64> {
        workspace::count(&self.tx, tenant_id, query)
    }

    fn update_workspace(&self, id: &str, name: &str, update_time: u64) -> Result<()> {
        workspace::update(&self.tx, id, name, update_time)
    }

    fn delete_workspace(&self, id: &str) -> Result<()> {
        workspace::delete(&self.tx, id)
    }

    fn workspace_slug_exists(&self, tenant_id: &str, slug: &str) -> Result<bool> {
        workspace::slug_exists(&self.tx, tenant_id, slug)
    }

    fn create_team(&self, team: &Team) -> Result<()> {
        team::create(&self.tx, team)
    }

    fn get_team(&self, id: &str) -> Result<Option<Team>> {
        team::get(&self.tx, id)
    }

    fn list_teams(&self, workspace_id: &str, query: Query) -> Result<Vec<Team>> {
        team::list(&self.tx, workspace_id, query)
    }

    fn count_teams(&self, workspace_id: &str, query: Query) -> Result<u64> {
        team::count(&self.tx, workspace_id, query)
    }

    fn update_team(&self, patch: PatchTeamParams) -> Result<()> {
        team::update(&self.tx, patch)
    }

    fn delete_team(&self, id: &str) -> Result<()> {
        team::delete(&self.tx, id)
    }

    fn team_slug_exists(&self, workspace_id: &str, slug: &str) -> Result<bool> {
        team::slug_exists(&self.tx, workspace_id, slug)
    }

    fn sync_team_permissions(&self, team_id: &str, permission_ids: &[String]) -> Result<()> {
        team::sync_permissions(&self.tx, team_id, permission_ids)
    }

    fn list_team_permissions(&self, team_id: &str) -> Result<Vec<Permission>> {
        team::list_permissions(&self.tx, team_id)
    }

    fn create_member(&self, m: &TeamMember) -> Result<()> {
        member::create(&self.tx, m)
    }

    fn get_member(&self, id: &str) -> Result<Option<TeamMember>> {
        member::get(&self.tx, id)
    }

    fn list_members(&self, team_id: &str) -> Result<Vec<TeamMember>> {
        member::list(&self.tx, team_id)
    }

    fn update_member_status(
        &self,
        id: &str,
        status: MemberStatus,
        update_time: u64,
    ) -> Result<()> {
        member::update_status(&self.tx, id, status, update_time)
    }

    fn activate_member(&self, member: &TeamMember, user_id: &str, update_time: u64) -> Result<()> {
        member::activate(&self.tx, member, user_id, update_time)
    }

    fn delete_member(&self, id: &str) -> Result<()> {
        member::delete(&self.tx, id)
    }

    fn create_permission(&self, p: &Permission) -> Result<()> {
        permission::create(&self.tx, p)
    }

    fn get_permission(&self, id: &str) -> Result<Option<Permission>> {
        permission::get(&self.tx, id)
    }

    fn list_permissions(&self, tenant_id: &str, query: Query) -> Result<Vec<Permission>> {
        permission::list(&self.tx, tenant_id, query)
    }

    fn count_permissions(&self, tenant_id: &str, query: Query) -> Result<u64> {
        permission::count(&self.tx, tenant_id, query)
    }

    fn update_permission(&self, patch: PatchPermissionParams) -> Result<()> {
        permission::update(&self.tx, patch)
    }

    fn delete_permission(&self, id: &str) -> Result<()> {
        permission::delete(&self.tx, id)
    }

    fn permission_slug_exists(&self, tenant_id: &str, slug: &str) -> Result<bool> {
        permission::slug_exists(&self.tx, tenant_id, slug)
    }

    fn user_has_team_permission(
        &self,
        workspace_id: &str,
        user_id: &str,
        slug: &str,
    ) -> Result<bool> {
        permission::user_has_team_permission(&self.tx, workspace_id, user_id, slug)
    }

    fn commit(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }

    fn rollback(self) -> Result<()> {
        self.tx.rollback()?;
        Ok(())
    }
}

/// Converts builder values into rusqlite parameter values.
pub(super) fn convert_values(values: Vec<Value>) -> Vec<DbValue> {
    values
        .into_iter()
        .map(|value| match value {
            Value::Text(text) => DbValue::Text(text),
            Value::Integer(integer) => DbValue::Integer(integer as i64),
            Value::Bool(boolean) => DbValue::Integer(boolean as i64),
        })
        .collect()
}
