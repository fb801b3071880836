//! Project and membership queries.

use crate::pool::{DbError, DbResult};
use rusqlite::{params, Connection, Row};

use super::now;

/// Project row from database.
#[derive(Debug, Clone)]
pub struct ProjectRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_by: String,
    pub progress: i64,
    pub created_at: String,
    pub updated_at: String,
}

const PROJECT_COLUMNS: &str =
    "p.id, p.name, p.description, p.created_by, p.progress, p.created_at, p.updated_at";

fn map_row(row: &Row<'_>) -> rusqlite::Result<ProjectRow> {
    Ok(ProjectRow {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_by: row.get(3)?,
        progress: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

/// Create a new project with progress 0.
pub fn insert_project(
    conn: &Connection,
    id: &str,
    name: &str,
    description: &str,
    created_by: &str,
) -> DbResult<()> {
    let now = now();
    conn.execute(
        "INSERT INTO projects (id, name, description, created_by, progress, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)",
        params![id, name, description, created_by, now],
    )?;
    Ok(())
}

/// Get a project by ID.
pub fn get_project(conn: &Connection, id: &str) -> DbResult<ProjectRow> {
    conn.query_row(
        &format!("SELECT {PROJECT_COLUMNS} FROM projects p WHERE p.id = ?1"),
        params![id],
        map_row,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("Project: {}", id)),
        e => DbError::Connection(e),
    })
}

/// List all projects.
pub fn list_projects(conn: &Connection) -> DbResult<Vec<ProjectRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects p ORDER BY p.created_at, p.id"
    ))?;
    let rows = stmt.query_map([], map_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// List projects a user owns or is a member of.
pub fn list_projects_for_user(conn: &Connection, user_id: &str) -> DbResult<Vec<ProjectRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects p
         WHERE p.created_by = ?1
            OR EXISTS (SELECT 1 FROM project_members m
                       WHERE m.project_id = p.id AND m.user_id = ?1)
         ORDER BY p.created_at, p.id"
    ))?;
    let rows = stmt.query_map(params![user_id], map_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Update project metadata.
pub fn update_project(conn: &Connection, id: &str, name: &str, description: &str) -> DbResult<()> {
    let changed = conn.execute(
        "UPDATE projects SET name = ?2, description = ?3, updated_at = ?4 WHERE id = ?1",
        params![id, name, description, now()],
    )?;
    if changed == 0 {
        return Err(DbError::NotFound(format!("Project: {}", id)));
    }
    Ok(())
}

/// Store a freshly computed progress percentage.
pub fn set_progress(conn: &Connection, id: &str, progress: i64) -> DbResult<()> {
    let changed = conn.execute(
        "UPDATE projects SET progress = ?2, updated_at = ?3 WHERE id = ?1",
        params![id, progress, now()],
    )?;
    if changed == 0 {
        return Err(DbError::NotFound(format!("Project: {}", id)));
    }
    Ok(())
}

/// Delete a project. Tasks and memberships cascade.
pub fn delete_project(conn: &Connection, id: &str) -> DbResult<usize> {
    let count = conn.execute("DELETE FROM projects WHERE id = ?1", params![id])?;
    Ok(count)
}

/// Add a member. Returns `false` when the user was already a member.
pub fn add_member(conn: &Connection, project_id: &str, user_id: &str) -> DbResult<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO project_members (project_id, user_id) VALUES (?1, ?2)",
        params![project_id, user_id],
    )?;
    Ok(inserted == 1)
}

/// Remove a member. Returns `false` when the user was not a member.
pub fn remove_member(conn: &Connection, project_id: &str, user_id: &str) -> DbResult<bool> {
    let removed = conn.execute(
        "DELETE FROM project_members WHERE project_id = ?1 AND user_id = ?2",
        params![project_id, user_id],
    )?;
    Ok(removed == 1)
}

/// List member user IDs of a project, sorted.
pub fn list_members(conn: &Connection, project_id: &str) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT user_id FROM project_members WHERE project_id = ?1 ORDER BY user_id",
    )?;
    let rows = stmt.query_map(params![project_id], |row| row.get(0))?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}
