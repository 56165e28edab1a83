use anyhow::Result;
use log::debug;
use rusqlite::{params, Connection, Transaction};
use teamgate_misc::api::member::{MemberStatus, TeamMember};

use crate::db::types::ValidationFailed;

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS team_member (
    id TEXT PRIMARY KEY NOT NULL,
    team_id TEXT NOT NULL,
    user_id TEXT,
    email TEXT,
    status TEXT NOT NULL,
    create_time INTEGER NOT NULL,
    update_time INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_member_team ON team_member(team_id);
CREATE INDEX IF NOT EXISTS idx_member_user ON team_member(user_id);
"#;

pub fn create_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLE_SQL)?;
    Ok(())
}

/// Inserts a membership record, enforcing the membership invariants
/// explicitly rather than through database constraints: exactly one of
/// user id / email, and no duplicate `(team_id, user_id)` or
/// `(team_id, email)` pair.
pub fn create(tx: &Transaction, member: &TeamMember) -> Result<()> {
    match (member.user_id.as_deref(), member.email.as_deref()) {
        (Some(_), Some(_)) => {
            return Err(
                ValidationFailed::new("member", "exactly one of user_id and email is required")
                    .into(),
            );
        }
        (None, None) => {
            return Err(
                ValidationFailed::new("member", "one of user_id and email is required").into(),
            );
        }
        (Some(user_id), None) => {
            if user_exists(tx, &member.team_id, user_id)? {
                return Err(
                    ValidationFailed::new("user_id", "user is already a member of this team")
                        .into(),
                );
            }
        }
        (None, Some(email)) => {
            if email_exists(tx, &member.team_id, email)? {
                return Err(
                    ValidationFailed::new("email", "email is already invited to this team").into(),
                );
            }
        }
    }

    let sql = r#"
    INSERT INTO team_member (id, team_id, user_id, email, status, create_time, update_time)
    VALUES (?, ?, ?, ?, ?, ?, ?)
    "#;
    debug!("Database create_member: {sql}, {member:?}");
    tx.execute(
        sql,
        params![
            member.id,
            member.team_id,
            member.user_id,
            member.email,
            member.status.to_string(),
            member.create_time,
            member.update_time,
        ],
    )?;

    Ok(())
}

pub fn get(tx: &Transaction, id: &str) -> Result<Option<TeamMember>> {
    let sql = r#"
    SELECT id, team_id, user_id, email, status, create_time, update_time
    FROM team_member WHERE id = ?
    "#;
    debug!("Database get_member: {id}");
    let mut stmt = tx.prepare(sql)?;
    let mut rows = stmt.query_map(params![id], map_row)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

pub fn list(tx: &Transaction, team_id: &str) -> Result<Vec<TeamMember>> {
    let sql = r#"
    SELECT id, team_id, user_id, email, status, create_time, update_time
    FROM team_member WHERE team_id = ?
    ORDER BY create_time
    "#;
    debug!("Database list_members: {team_id}");
    let mut stmt = tx.prepare(sql)?;
    let members = stmt
        .query_map(params![team_id], map_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(members)
}

pub fn update_status(
    tx: &Transaction,
    id: &str,
    status: MemberStatus,
    update_time: u64,
) -> Result<()> {
    let sql = "UPDATE team_member SET status = ?, update_time = ? WHERE id = ?";
    debug!("Database update_member_status: {id} -> {status}");
    tx.execute(sql, params![status.to_string(), update_time, id])?;
    Ok(())
}

/// Flips a pending invitation to active and binds it to the accepting
/// user's id. Email invitations carry no user id until accepted, and an
/// unbound record never contributes to permission resolution.
pub fn activate(tx: &Transaction, member: &TeamMember, user_id: &str, update_time: u64) -> Result<()> {
    if member.user_id.as_deref() != Some(user_id) && user_exists(tx, &member.team_id, user_id)? {
        return Err(
            ValidationFailed::new("user_id", "user is already a member of this team").into(),
        );
    }

    let sql = "UPDATE team_member SET status = ?, user_id = ?, update_time = ? WHERE id = ?";
    debug!("Database activate_member: {} -> {user_id}", member.id);
    tx.execute(
        sql,
        params![
            MemberStatus::Active.to_string(),
            user_id,
            update_time,
            member.id
        ],
    )?;
    Ok(())
}

pub fn delete(tx: &Transaction, id: &str) -> Result<()> {
    let sql = "DELETE FROM team_member WHERE id = ?";
    debug!("Database delete_member: {id}");
    tx.execute(sql, params![id])?;
    Ok(())
}

fn user_exists(tx: &Transaction, team_id: &str, user_id: &str) -> Result<bool> {
    let sql = "SELECT COUNT(1) FROM team_member WHERE team_id = ? AND user_id = ?";
    let count: i64 = tx.query_row(sql, params![team_id, user_id], |row| row.get(0))?;
    Ok(count > 0)
}

fn email_exists(tx: &Transaction, team_id: &str, email: &str) -> Result<bool> {
    let sql = "SELECT COUNT(1) FROM team_member WHERE team_id = ? AND email = ?";
    let count: i64 = tx.query_row(sql, params![team_id, email], |row| row.get(0))?;
    Ok(count > 0)
}

fn map_row(row: &rusqlite::Row) -> rusqlite::Result<TeamMember> {
    let status: String = row.get(4)?;
    let status = MemberStatus::parse(&status).unwrap_or(MemberStatus::Pending);
    Ok(TeamMember {
        id: row.get(0)?,
        team_id: row.get(1)?,
        user_id: row.get(2)?,
        email: row.get(3)?,
        status,
        create_time: row.get(5)?,
        update_time: row.get(6)?,
    })
}
