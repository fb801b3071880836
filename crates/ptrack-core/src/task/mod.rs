//! Task records.
//!
//! Every write recomputes the parent project's progress inside the same
//! transaction, so a caller never observes a task change without the
//! matching project percentage.

pub mod model;

use crate::authz::{self, ensure};
use crate::error::{OrNotFound, TrackerError, TrackerResult};
use crate::project::{self, recompute_project_progress};
use crate::validation::{percentage, required_text, MAX_NAME_LEN};
use crate::Identity;
use model::{Task, TaskChanges};
use ptrack_db::queries::tasks as queries;
use ptrack_db::queries::users;
use ptrack_db::{Connection, DbPool};
use uuid::Uuid;

fn load(conn: &Connection, id: &str) -> TrackerResult<Task> {
    let row = queries::get_task(conn, id)
        .or_not_found(|| TrackerError::TaskNotFound(id.to_string()))?;
    Ok(Task::from_row(row))
}

fn require_user(conn: &Connection, user_id: &str) -> TrackerResult<()> {
    if users::user_exists(conn, user_id)? {
        Ok(())
    } else {
        Err(TrackerError::UserNotFound(user_id.to_string()))
    }
}

/// Create an incomplete task in a project the actor owns.
pub fn create_task(
    pool: &DbPool,
    actor: &Identity,
    project_id: &str,
    name: &str,
    description: &str,
    assignee: &str,
) -> TrackerResult<Task> {
    pool.transaction(|tx| {
        let project = project::load(tx, project_id)?;
        ensure(
            authz::can_create_task(actor, &project),
            "add tasks to this project",
        )?;
        let name = required_text("name", name, MAX_NAME_LEN)?;
        require_user(tx, assignee)?;

        let id = Uuid::new_v4().to_string();
        queries::insert_task(tx, &id, project_id, &name, description.trim(), assignee)?;
        recompute_project_progress(tx, project_id)?;
        load(tx, &id)
    })
}

/// Get a task the actor may view.
pub fn get_task(pool: &DbPool, actor: &Identity, id: &str) -> TrackerResult<Task> {
    pool.read(|conn| {
        let task = load(conn, id)?;
        let project = project::load(conn, &task.project_id)?;
        ensure(authz::can_view_task(actor, &task, &project), "view this task")?;
        Ok(task)
    })
}

/// List tasks the actor may view, optionally limited to one project.
pub fn list_tasks(
    pool: &DbPool,
    actor: &Identity,
    project_id: Option<&str>,
) -> TrackerResult<Vec<Task>> {
    pool.read(|conn| {
        let rows = match project_id {
            Some(project_id) => {
                let project = project::load(conn, project_id)?;
                ensure(
                    authz::can_view_project(actor, &project),
                    "view this project",
                )?;
                queries::list_tasks(conn, project_id)?
            }
            None if actor.is_administrator => queries::list_all_tasks(conn)?,
            None => queries::list_tasks_in_projects_of(conn, &actor.id)?,
        };
        Ok(rows.into_iter().map(Task::from_row).collect())
    })
}

/// Set a task's progress and, when given, its completion flag.
///
/// `progress` outside `0..=100` is rejected, not clamped. A `completed` of
/// `None` keeps the stored flag.
pub fn update_task_progress(
    pool: &DbPool,
    actor: &Identity,
    id: &str,
    progress: i64,
    completed: Option<bool>,
) -> TrackerResult<Task> {
    pool.transaction(|tx| {
        let task = load(tx, id)?;
        ensure(authz::can_update_task(actor, &task), "update this task")?;
        let progress = percentage("progress", progress)?;
        let completed = completed.unwrap_or(task.completed);

        queries::update_task_progress(tx, id, i64::from(progress), completed)?;
        recompute_project_progress(tx, &task.project_id)?;
        load(tx, id)
    })
}

/// Edit any caller-settable field of a task in one transaction.
///
/// The parent project cannot change; naming a different one is a
/// validation failure.
pub fn update_task(
    pool: &DbPool,
    actor: &Identity,
    id: &str,
    changes: &TaskChanges,
) -> TrackerResult<Task> {
    pool.transaction(|tx| {
        let task = load(tx, id)?;
        ensure(authz::can_update_task(actor, &task), "update this task")?;

        if let Some(project) = &changes.project {
            if *project != task.project_id {
                return Err(TrackerError::validation(
                    "a task cannot be moved to another project",
                ));
            }
        }
        let name = match &changes.name {
            Some(name) => required_text("name", name, MAX_NAME_LEN)?,
            None => task.name.clone(),
        };
        let description = changes
            .description
            .as_deref()
            .map(str::trim)
            .unwrap_or(task.description.as_str());
        let assignee = changes.assigned_to.as_deref().unwrap_or(task.assigned_to.as_str());
        require_user(tx, assignee)?;
        let progress = match changes.progress {
            Some(progress) => percentage("progress", progress)?,
            None => task.progress,
        };
        let completed = changes.completed.unwrap_or(task.completed);

        queries::update_task_details(tx, id, &name, description, assignee)?;
        if progress != task.progress || completed != task.completed {
            queries::update_task_progress(tx, id, i64::from(progress), completed)?;
        }
        recompute_project_progress(tx, &task.project_id)?;
        load(tx, id)
    })
}

/// Delete a task and recompute its project's progress.
pub fn delete_task(pool: &DbPool, actor: &Identity, id: &str) -> TrackerResult<Task> {
    pool.transaction(|tx| {
        let task = load(tx, id)?;
        let project = project::load(tx, &task.project_id)?;
        ensure(
            authz::can_delete_task(actor, &task, &project),
            "delete this task",
        )?;

        queries::delete_task(tx, id)?;
        recompute_project_progress(tx, &task.project_id)?;
        Ok(task)
    })
}
