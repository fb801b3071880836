//! User directory queries.

use crate::pool::{DbError, DbResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// User row from database.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub date_joined: String,
}

const USER_COLUMNS: &str =
    "id, username, email, first_name, last_name, password_hash, is_admin, date_joined";

fn map_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        first_name: row.get(3)?,
        last_name: row.get(4)?,
        password_hash: row.get(5)?,
        is_admin: row.get(6)?,
        date_joined: row.get(7)?,
    })
}

/// Insert a new user. `date_joined` is taken from the row as given.
pub fn insert_user(conn: &Connection, user: &UserRow) -> DbResult<()> {
    conn.execute(
        "INSERT INTO users (id, username, email, first_name, last_name, password_hash, is_admin, date_joined)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            user.id,
            user.username,
            user.email,
            user.first_name,
            user.last_name,
            user.password_hash,
            user.is_admin,
            user.date_joined,
        ],
    )?;
    Ok(())
}

/// Get a user by ID.
pub fn get_user(conn: &Connection, id: &str) -> DbResult<UserRow> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
        params![id],
        map_row,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("User: {}", id)),
        e => DbError::Connection(e),
    })
}

/// Find a user by username.
pub fn find_user_by_username(conn: &Connection, username: &str) -> DbResult<Option<UserRow>> {
    let row = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
            params![username],
            map_row,
        )
        .optional()?;
    Ok(row)
}

/// List all users ordered by username.
pub fn list_users(conn: &Connection) -> DbResult<Vec<UserRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY username"
    ))?;
    let rows = stmt.query_map([], map_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Overwrite a user's editable fields. `id`, `is_admin` and `date_joined` stay.
pub fn update_user(conn: &Connection, user: &UserRow) -> DbResult<()> {
    let changed = conn.execute(
        "UPDATE users SET username = ?2, email = ?3, first_name = ?4, last_name = ?5,
                          password_hash = ?6
         WHERE id = ?1",
        params![
            user.id,
            user.username,
            user.email,
            user.first_name,
            user.last_name,
            user.password_hash,
        ],
    )?;
    if changed == 0 {
        return Err(DbError::NotFound(format!("User: {}", user.id)));
    }
    Ok(())
}

/// Delete a user. Owned projects, memberships and assigned tasks cascade.
pub fn delete_user(conn: &Connection, id: &str) -> DbResult<usize> {
    let count = conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;
    Ok(count)
}

/// Check whether a user with the given ID exists.
pub fn user_exists(conn: &Connection, id: &str) -> DbResult<bool> {
    let found: Option<i64> = conn
        .query_row("SELECT 1 FROM users WHERE id = ?1", params![id], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(found.is_some())
}
