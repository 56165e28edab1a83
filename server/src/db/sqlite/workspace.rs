use anyhow::Result;
use log::debug;
use rusqlite::types::Value as DbValue;
use rusqlite::{params, params_from_iter, Connection, Transaction};
use teamgate_misc::api::workspace::Workspace;
use teamgate_misc::api::{Query, Value};

use crate::db::sql::Select;

use super::convert_values;

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS workspace (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    slug TEXT NOT NULL,
    owner_user_id TEXT NOT NULL,
    tenant_id TEXT NOT NULL,
    create_time INTEGER NOT NULL,
    update_time INTEGER NOT NULL,
    UNIQUE(tenant_id, slug)
);
CREATE INDEX IF NOT EXISTS idx_workspace_tenant ON workspace(tenant_id);
"#;

pub fn create_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLE_SQL)?;
    Ok(())
}

pub fn create(tx: &Transaction, workspace: &Workspace) -> Result<()> {
    let sql = r#"
    INSERT INTO workspace (id, name, slug, owner_user_id, tenant_id, create_time, update_time)
    VALUES (?, ?, ?, ?, ?, ?, ?)
    "#;
    debug!("Database create_workspace: {sql}, {workspace:?}");
    tx.execute(
        sql,
        params![
            workspace.id,
            workspace.name,
            workspace.slug,
            workspace.owner_user_id,
            workspace.tenant_id,
            workspace.create_time,
            workspace.update_time,
        ],
    )?;

    Ok(())
}

pub fn get(tx: &Transaction, id: &str) -> Result<Option<Workspace>> {
    let sql = r#"
    SELECT id, name, slug, owner_user_id, tenant_id, create_time, update_time
    FROM workspace WHERE id = ?
    "#;
    debug!("Database get_workspace: {id}");
    let mut stmt = tx.prepare(sql)?;
    let mut rows = stmt.query_map(params![id], map_row)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

pub fn update(tx: &Transaction, id: &str, name: &str, update_time: u64) -> Result<()> {
    let sql = "UPDATE workspace SET name = ?, update_time = ? WHERE id = ?";
    debug!("Database update_workspace: {sql}, {id}");
    tx.execute(sql, params![name, update_time, id])?;
    Ok(())
}

/// Deletes the workspace and everything nested under it: permission
/// links and members of its teams, then the teams, then the workspace.
pub fn delete(tx: &Transaction, id: &str) -> Result<()> {
    debug!("Database delete_workspace: {id}");
    tx.execute(
        "DELETE FROM team_permission WHERE team_id IN (SELECT id FROM team WHERE workspace_id = ?)",
        params![id],
    )?;
    tx.execute(
        "DELETE FROM team_member WHERE team_id IN (SELECT id FROM team WHERE workspace_id = ?)",
        params![id],
    )?;
    tx.execute("DELETE FROM team WHERE workspace_id = ?", params![id])?;
    tx.execute("DELETE FROM workspace WHERE id = ?", params![id])?;
    Ok(())
}

pub fn slug_exists(tx: &Transaction, tenant_id: &str, slug: &str) -> Result<bool> {
    let sql = "SELECT COUNT(1) FROM workspace WHERE tenant_id = ? AND slug = ?";
    let count: i64 = tx.query_row(sql, params![tenant_id, slug], |row| row.get(0))?;
    Ok(count > 0)
}

pub fn list(tx: &Transaction, tenant_id: &str, query: Query) -> Result<Vec<Workspace>> {
    let (sql, values) = build_select_sql(false, tenant_id, query);
    debug!("Database list_workspaces: {sql}, {values:?}");

    let mut stmt = tx.prepare(&sql)?;
    let workspaces = stmt
        .query_map(params_from_iter(values), map_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(workspaces)
}

pub fn count(tx: &Transaction, tenant_id: &str, query: Query) -> Result<u64> {
    let (sql, values) = build_select_sql(true, tenant_id, query);
    debug!("Database count_workspaces: {sql}, {values:?}");

    let mut stmt = tx.prepare(&sql)?;
    let count: i64 = stmt.query_row(params_from_iter(values), |row| row.get(0))?;

    Ok(count as u64)
}

fn build_select_sql(count: bool, tenant_id: &str, query: Query) -> (String, Vec<DbValue>) {
    let mut select = if count {
        Select::count("workspace")
    } else {
        Select::new(
            vec![
                "id",
                "name",
                "slug",
                "owner_user_id",
                "tenant_id",
                "create_time",
                "update_time",
            ],
            "workspace",
        )
    };

    select.add_where("tenant_id = ?", Value::Text(tenant_id.to_string()));
    select.set_query(query, "name");
    select.add_order_by("update_time DESC");

    let (sql, values) = select.build();
    let values = convert_values(values);

    (sql, values)
}

fn map_row(row: &rusqlite::Row) -> rusqlite::Result<Workspace> {
    Ok(Workspace {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        owner_user_id: row.get(3)?,
        tenant_id: row.get(4)?,
        create_time: row.get(5)?,
        update_time: row.get(6)?,
    })
}
