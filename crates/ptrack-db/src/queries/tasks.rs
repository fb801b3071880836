//! Task queries.

use crate::pool::{DbError, DbResult};
use rusqlite::{params, Connection, Row};

use super::now;

/// Task row from database.
#[derive(Debug, Clone)]
pub struct TaskRow {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub description: String,
    pub assigned_to: String,
    pub completed: bool,
    pub progress: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Completion counts for a project's task set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskCounts {
    pub total: u64,
    pub completed: u64,
}

const TASK_COLUMNS: &str = "t.id, t.project_id, t.name, t.description, t.assigned_to,
     t.completed, t.progress, t.created_at, t.updated_at";

fn map_row(row: &Row<'_>) -> rusqlite::Result<TaskRow> {
    Ok(TaskRow {
        id: row.get(0)?,
        project_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        assigned_to: row.get(4)?,
        completed: row.get(5)?,
        progress: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

/// Create a new, incomplete task with progress 0.
pub fn insert_task(
    conn: &Connection,
    id: &str,
    project_id: &str,
    name: &str,
    description: &str,
    assigned_to: &str,
) -> DbResult<()> {
    let now = now();
    conn.execute(
        "INSERT INTO tasks (id, project_id, name, description, assigned_to, completed, progress, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 0, 0, ?6, ?6)",
        params![id, project_id, name, description, assigned_to, now],
    )?;
    Ok(())
}

/// Get a task by ID.
pub fn get_task(conn: &Connection, id: &str) -> DbResult<TaskRow> {
    conn.query_row(
        &format!("SELECT {TASK_COLUMNS} FROM tasks t WHERE t.id = ?1"),
        params![id],
        map_row,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("Task: {}", id)),
        e => DbError::Connection(e),
    })
}

/// List tasks for a project.
pub fn list_tasks(conn: &Connection, project_id: &str) -> DbResult<Vec<TaskRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks t WHERE t.project_id = ?1
         ORDER BY t.completed, t.created_at, t.id"
    ))?;
    let rows = stmt.query_map(params![project_id], map_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// List every task.
pub fn list_all_tasks(conn: &Connection) -> DbResult<Vec<TaskRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks t ORDER BY t.project_id, t.completed, t.created_at, t.id"
    ))?;
    let rows = stmt.query_map([], map_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// List tasks in projects the user owns or is a member of.
pub fn list_tasks_in_projects_of(conn: &Connection, user_id: &str) -> DbResult<Vec<TaskRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks t
         JOIN projects p ON p.id = t.project_id
         WHERE p.created_by = ?1
            OR EXISTS (SELECT 1 FROM project_members m
                       WHERE m.project_id = p.id AND m.user_id = ?1)
         ORDER BY t.project_id, t.completed, t.created_at, t.id"
    ))?;
    let rows = stmt.query_map(params![user_id], map_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Update a task's descriptive fields.
pub fn update_task_details(
    conn: &Connection,
    id: &str,
    name: &str,
    description: &str,
    assigned_to: &str,
) -> DbResult<()> {
    let changed = conn.execute(
        "UPDATE tasks SET name = ?2, description = ?3, assigned_to = ?4, updated_at = ?5
         WHERE id = ?1",
        params![id, name, description, assigned_to, now()],
    )?;
    if changed == 0 {
        return Err(DbError::NotFound(format!("Task: {}", id)));
    }
    Ok(())
}

/// Update a task's progress and completion flag.
pub fn update_task_progress(
    conn: &Connection,
    id: &str,
    progress: i64,
    completed: bool,
) -> DbResult<()> {
    let changed = conn.execute(
        "UPDATE tasks SET progress = ?2, completed = ?3, updated_at = ?4 WHERE id = ?1",
        params![id, progress, completed, now()],
    )?;
    if changed == 0 {
        return Err(DbError::NotFound(format!("Task: {}", id)));
    }
    Ok(())
}

/// Delete a task.
pub fn delete_task(conn: &Connection, id: &str) -> DbResult<usize> {
    let count = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
    Ok(count)
}

/// Projects holding tasks assigned to `user_id`, excluding ones the user owns.
pub fn projects_with_tasks_assigned_to(conn: &Connection, user_id: &str) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT t.project_id FROM tasks t
         JOIN projects p ON p.id = t.project_id
         WHERE t.assigned_to = ?1 AND p.created_by <> ?1
         ORDER BY t.project_id",
    )?;
    let rows = stmt.query_map(params![user_id], |row| row.get(0))?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Count total and completed tasks in a project.
pub fn count_tasks(conn: &Connection, project_id: &str) -> DbResult<TaskCounts> {
    let (total, completed): (i64, i64) = conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(completed), 0) FROM tasks WHERE project_id = ?1",
        params![project_id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    Ok(TaskCounts {
        total: total as u64,
        completed: completed as u64,
    })
}
