//! Project records: creation, metadata, membership and progress.

pub mod model;
pub mod progress;

use crate::authz::{self, ensure};
use crate::error::{OrNotFound, TrackerError, TrackerResult};
use crate::validation::{required_text, MAX_NAME_LEN};
use crate::Identity;
use model::{Project, ProjectChanges};
use ptrack_db::queries::projects as queries;
use ptrack_db::queries::users;
use ptrack_db::{Connection, DbPool};
use uuid::Uuid;

pub use progress::recompute_project_progress;

/// Load a project with its members through an open connection.
pub(crate) fn load(conn: &Connection, id: &str) -> TrackerResult<Project> {
    let row = queries::get_project(conn, id)
        .or_not_found(|| TrackerError::ProjectNotFound(id.to_string()))?;
    let members = queries::list_members(conn, id)?;
    Ok(Project::from_row(row, members))
}

fn require_user(conn: &Connection, user_id: &str) -> TrackerResult<()> {
    if users::user_exists(conn, user_id)? {
        Ok(())
    } else {
        Err(TrackerError::UserNotFound(user_id.to_string()))
    }
}

/// Create a project owned by `owner`.
///
/// The owner keeps full access without appearing in `members`.
pub fn create_project(
    pool: &DbPool,
    owner: &Identity,
    name: &str,
    description: &str,
    members: &[String],
) -> TrackerResult<Project> {
    let name = required_text("name", name, MAX_NAME_LEN)?;

    pool.transaction(|tx| {
        for member in members {
            require_user(tx, member)?;
        }

        let id = Uuid::new_v4().to_string();
        queries::insert_project(tx, &id, &name, description.trim(), &owner.id)?;
        for member in members {
            queries::add_member(tx, &id, member)?;
        }
        load(tx, &id)
    })
}

/// Get a project the actor may view.
pub fn get_project(pool: &DbPool, actor: &Identity, id: &str) -> TrackerResult<Project> {
    pool.read(|conn| {
        let project = load(conn, id)?;
        ensure(authz::can_view_project(actor, &project), "view this project")?;
        Ok(project)
    })
}

/// List projects visible to the actor: all of them for administrators,
/// otherwise the ones they own or belong to.
pub fn list_projects(pool: &DbPool, actor: &Identity) -> TrackerResult<Vec<Project>> {
    pool.read(|conn| {
        let rows = if actor.is_administrator {
            queries::list_projects(conn)?
        } else {
            queries::list_projects_for_user(conn, &actor.id)?
        };

        let mut projects = Vec::with_capacity(rows.len());
        for row in rows {
            let members = queries::list_members(conn, &row.id)?;
            projects.push(Project::from_row(row, members));
        }
        Ok(projects)
    })
}

/// Edit a project's name or description.
pub fn update_project(
    pool: &DbPool,
    actor: &Identity,
    id: &str,
    changes: &ProjectChanges,
) -> TrackerResult<Project> {
    pool.transaction(|tx| {
        let project = load(tx, id)?;
        ensure(authz::can_modify_project(actor, &project), "edit this project")?;

        let name = match &changes.name {
            Some(name) => required_text("name", name, MAX_NAME_LEN)?,
            None => project.name.clone(),
        };
        let description = changes
            .description
            .as_deref()
            .map(str::trim)
            .unwrap_or(project.description.as_str());

        queries::update_project(tx, id, &name, description)?;
        load(tx, id)
    })
}

/// Add a member. Adding an existing member changes nothing.
pub fn add_member(
    pool: &DbPool,
    actor: &Identity,
    project_id: &str,
    user_id: &str,
) -> TrackerResult<Project> {
    pool.transaction(|tx| {
        let project = load(tx, project_id)?;
        ensure(
            authz::can_modify_project(actor, &project),
            "add members to this project",
        )?;
        require_user(tx, user_id)?;

        if queries::add_member(tx, project_id, user_id)? {
            load(tx, project_id)
        } else {
            Ok(project)
        }
    })
}

/// Remove a member. Removing a non-member changes nothing.
pub fn remove_member(
    pool: &DbPool,
    actor: &Identity,
    project_id: &str,
    user_id: &str,
) -> TrackerResult<Project> {
    pool.transaction(|tx| {
        let project = load(tx, project_id)?;
        ensure(
            authz::can_modify_project(actor, &project),
            "remove members from this project",
        )?;

        if queries::remove_member(tx, project_id, user_id)? {
            load(tx, project_id)
        } else {
            Ok(project)
        }
    })
}

/// Delete a project together with its tasks.
pub fn delete_project(pool: &DbPool, actor: &Identity, id: &str) -> TrackerResult<Project> {
    pool.transaction(|tx| {
        let project = load(tx, id)?;
        ensure(authz::can_modify_project(actor, &project), "delete this project")?;
        queries::delete_project(tx, id)?;
        Ok(project)
    })
}
