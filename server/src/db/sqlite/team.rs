use anyhow::Result;
use log::debug;
use rusqlite::types::Value as DbValue;
use rusqlite::{params, params_from_iter, Connection, Transaction};
use teamgate_misc::api::permission::Permission;
use teamgate_misc::api::team::Team;
use teamgate_misc::api::{Query, Value};

use crate::db::sql::{Select, Update};
use crate::db::types::PatchTeamParams;

use super::convert_values;

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS team (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    slug TEXT NOT NULL,
    description TEXT,
    workspace_id TEXT NOT NULL,
    create_time INTEGER NOT NULL,
    update_time INTEGER NOT NULL,
    UNIQUE(workspace_id, slug)
);
CREATE INDEX IF NOT EXISTS idx_team_workspace ON team(workspace_id);

CREATE TABLE IF NOT EXISTS team_permission (
    team_id TEXT NOT NULL,
    permission_id TEXT NOT NULL,
    PRIMARY KEY(team_id, permission_id)
);
"#;

pub fn create_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLE_SQL)?;
    Ok(())
}

pub fn create(tx: &Transaction, team: &Team) -> Result<()> {
    let sql = r#"
    INSERT INTO team (id, name, slug, description, workspace_id, create_time, update_time)
    VALUES (?, ?, ?, ?, ?, ?, ?)
    "#;
    debug!("Database create_team: {sql}, {team:?}");
    tx.execute(
        sql,
        params![
            team.id,
            team.name,
            team.slug,
            team.description,
            team.workspace_id,
            team.create_time,
            team.update_time,
        ],
    )?;

    Ok(())
}

pub fn get(tx: &Transaction, id: &str) -> Result<Option<Team>> {
    let sql = r#"
    SELECT id, name, slug, description, workspace_id, create_time, update_time
    FROM team WHERE id = ?
    "#;
    debug!("Database get_team: {id}");
    let mut stmt = tx.prepare(sql)?;
    let mut rows = stmt.query_map(params![id], map_row)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

pub fn update(tx: &Transaction, patch: PatchTeamParams) -> Result<()> {
    let mut update = Update::new("team");

    if let Some(name) = patch.name {
        update.add_field("name", Value::Text(name));
    }
    if let Some(description) = patch.description {
        update.add_field("description", Value::Text(description));
    }

    update.add_field("update_time", Value::Integer(patch.update_time));
    update.add_where("id = ?", Value::Text(patch.id));

    let (sql, values) = update.build();
    if sql.is_empty() {
        return Ok(());
    }
    let values = convert_values(values);

    debug!("Database update_team: {sql}, {values:?}");
    tx.execute(&sql, params_from_iter(values.iter()))?;

    Ok(())
}

/// Deletes the team, its members and its permission links.
pub fn delete(tx: &Transaction, id: &str) -> Result<()> {
    debug!("Database delete_team: {id}");
    tx.execute("DELETE FROM team_permission WHERE team_id = ?", params![id])?;
    tx.execute("DELETE FROM team_member WHERE team_id = ?", params![id])?;
    tx.execute("DELETE FROM team WHERE id = ?", params![id])?;
    Ok(())
}

pub fn slug_exists(tx: &Transaction, workspace_id: &str, slug: &str) -> Result<bool> {
    let sql = "SELECT COUNT(1) FROM team WHERE workspace_id = ? AND slug = ?";
    let count: i64 = tx.query_row(sql, params![workspace_id, slug], |row| row.get(0))?;
    Ok(count > 0)
}

pub fn list(tx: &Transaction, workspace_id: &str, query: Query) -> Result<Vec<Team>> {
    let (sql, values) = build_select_sql(false, workspace_id, query);
    debug!("Database list_teams: {sql}, {values:?}");

    let mut stmt = tx.prepare(&sql)?;
    let teams = stmt
        .query_map(params_from_iter(values), map_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(teams)
}

pub fn count(tx: &Transaction, workspace_id: &str, query: Query) -> Result<u64> {
    let (sql, values) = build_select_sql(true, workspace_id, query);
    debug!("Database count_teams: {sql}, {values:?}");

    let mut stmt = tx.prepare(&sql)?;
    let count: i64 = stmt.query_row(params_from_iter(values), |row| row.get(0))?;

    Ok(count as u64)
}

/// Replaces the full permission set of the team. Last writer wins when
/// two callers sync concurrently; the store transaction is the unit of
/// atomicity.
pub fn sync_permissions(tx: &Transaction, team_id: &str, permission_ids: &[String]) -> Result<()> {
    debug!("Database sync_team_permissions: {team_id}, {permission_ids:?}");
    tx.execute(
        "DELETE FROM team_permission WHERE team_id = ?",
        params![team_id],
    )?;
    let sql = "INSERT INTO team_permission (team_id, permission_id) VALUES (?, ?)";
    for permission_id in permission_ids {
        tx.execute(sql, params![team_id, permission_id])?;
    }
    Ok(())
}

pub fn list_permissions(tx: &Transaction, team_id: &str) -> Result<Vec<Permission>> {
    let sql = r#"
    SELECT p.id, p.name, p.slug, p.description, p.tenant_id, p.create_time, p.update_time
    FROM permission p
    INNER JOIN team_permission tp ON tp.permission_id = p.id
    WHERE tp.team_id = ?
    ORDER BY p.slug
    "#;
    debug!("Database list_team_permissions: {team_id}");
    let mut stmt = tx.prepare(sql)?;
    let permissions = stmt
        .query_map(params![team_id], |row| {
            Ok(Permission {
                id: row.get(0)?,
                name: row.get(1)?,
                slug: row.get(2)?,
                description: row.get(3)?,
                tenant_id: row.get(4)?,
                create_time: row.get(5)?,
                update_time: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(permissions)
}

fn build_select_sql(count: bool, workspace_id: &str, query: Query) -> (String, Vec<DbValue>) {
    let mut select = if count {
        Select::count("team")
    } else {
        Select::new(
            vec![
                "id",
                "name",
                "slug",
                "description",
                "workspace_id",
                "create_time",
                "update_time",
            ],
            "team",
        )
    };

    select.add_where("workspace_id = ?", Value::Text(workspace_id.to_string()));
    select.set_query(query, "name");
    select.add_order_by("update_time DESC");

    let (sql, values) = select.build();
    let values = convert_values(values);

    (sql, values)
}

fn map_row(row: &rusqlite::Row) -> rusqlite::Result<Team> {
    Ok(Team {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        description: row.get(3)?,
        workspace_id: row.get(4)?,
        create_time: row.get(5)?,
        update_time: row.get(6)?,
    })
}
