use anyhow::Result;
use log::debug;
use rusqlite::types::Value as DbValue;
use rusqlite::{params, params_from_iter, Connection, Transaction};
use teamgate_misc::api::permission::Permission;
use teamgate_misc::api::{Query, Value};

use crate::db::sql::{Select, Update};
use crate::db::types::PatchPermissionParams;

use super::convert_values;

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS permission (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    slug TEXT NOT NULL,
    description TEXT,
    tenant_id TEXT NOT NULL,
    create_time INTEGER NOT NULL,
    update_time INTEGER NOT NULL,
    UNIQUE(tenant_id, slug)
);
CREATE INDEX IF NOT EXISTS idx_permission_tenant ON permission(tenant_id);
"#;

pub fn create_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLE_SQL)?;
    Ok(())
}

pub fn create(tx: &Transaction, permission: &Permission) -> Result<()> {
    let sql = r#"
    INSERT INTO permission (id, name, slug, description, tenant_id, create_time, update_time)
    VALUES (?, ?, ?, ?, ?, ?, ?)
    "#;
    debug!("Database create_permission: {sql}, {permission:?}");
    tx.execute(
        sql,
        params![
            permission.id,
            permission.name,
            permission.slug,
            permission.description,
            permission.tenant_id,
            permission.create_time,
            permission.update_time,
        ],
    )?;

    Ok(())
}

pub fn get(tx: &Transaction, id: &str) -> Result<Option<Permission>> {
    let sql = r#"
    SELECT id, name, slug, description, tenant_id, create_time, update_time
    FROM permission WHERE id = ?
    "#;
    debug!("Database get_permission: {id}");
    let mut stmt = tx.prepare(sql)?;
    let mut rows = stmt.query_map(params![id], map_row)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

pub fn update(tx: &Transaction, patch: PatchPermissionParams) -> Result<()> {
    let mut update = Update::new("permission");

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

    debug!("Database update_permission: {sql}, {values:?}");
    tx.execute(&sql, params_from_iter(values.iter()))?;

    Ok(())
}

/// Detaches the permission from all teams before removing the record.
pub fn delete(tx: &Transaction, id: &str) -> Result<()> {
    debug!("Database delete_permission: {id}");
    tx.execute(
        "DELETE FROM team_permission WHERE permission_id = ?",
        params![id],
    )?;
    tx.execute("DELETE FROM permission WHERE id = ?", params![id])?;
    Ok(())
}

pub fn slug_exists(tx: &Transaction, tenant_id: &str, slug: &str) -> Result<bool> {
    let sql = "SELECT COUNT(1) FROM permission WHERE tenant_id = ? AND slug = ?";
    let count: i64 = tx.query_row(sql, params![tenant_id, slug], |row| row.get(0))?;
    Ok(count > 0)
}

pub fn list(tx: &Transaction, tenant_id: &str, query: Query) -> Result<Vec<Permission>> {
    let (sql, values) = build_select_sql(false, tenant_id, query);
    debug!("Database list_permissions: {sql}, {values:?}");

    let mut stmt = tx.prepare(&sql)?;
    let permissions = stmt
        .query_map(params_from_iter(values), map_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(permissions)
}

pub fn count(tx: &Transaction, tenant_id: &str, query: Query) -> Result<u64> {
    let (sql, values) = build_select_sql(true, tenant_id, query);
    debug!("Database count_permissions: {sql}, {values:?}");

    let mut stmt = tx.prepare(&sql)?;
    let count: i64 = stmt.query_row(params_from_iter(values), |row| row.get(0))?;

    Ok(count as u64)
}

/// The permission resolution engine's query: true when the user has an
/// active membership in any team of the workspace whose permission set
/// contains the slug.
pub fn user_has_team_permission(
    tx: &Transaction,
    workspace_id: &str,
    user_id: &str,
    slug: &str,
) -> Result<bool> {
    let sql = r#"
    SELECT COUNT(1)
    FROM team_member tm
    INNER JOIN team t ON t.id = tm.team_id
    INNER JOIN team_permission tp ON tp.team_id = t.id
    INNER JOIN permission p ON p.id = tp.permission_id
    WHERE t.workspace_id = ?
      AND tm.user_id = ?
      AND tm.status = 'active'
      AND p.slug = ?
    "#;
    debug!("Database user_has_team_permission: {workspace_id}, {user_id}, {slug}");
    let count: i64 = tx.query_row(sql, params![workspace_id, user_id, slug], |row| row.get(0))?;
    Ok(count > 0)
}

fn build_select_sql(count: bool, tenant_id: &str, query: Query) -> (String, Vec<DbValue>) {
    let mut select = if count {
        Select::count("permission")
    } else {
        Select::new(
            vec![
                "id",
                "name",
                "slug",
                "description",
                "tenant_id",
                "create_time",
                "update_time",
            ],
            "permission",
        )
    };

    select.add_where("tenant_id = ?", Value::Text(tenant_id.to_string()));
    select.set_query(query, "slug");
    select.add_order_by("slug");

    let (sql, values) = select.build();
    let values = convert_values(values);

    (sql, values)
}

fn map_row(row: &rusqlite::Row) -> rusqlite::Result<Permission> {
    Ok(Permission {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        description: row.get(3)?,
        tenant_id: row.get(4)?,
        create_time: row.get(5)?,
        update_time: row.get(6)?,
    })
}
