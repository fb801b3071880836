//! Authorization rules.
//!
//! Plain predicates over an identity and the record it wants to touch.
//! Administrators pass every check. A project's owner is authorized whether
//! or not they appear in its member list.

use crate::error::{TrackerError, TrackerResult};
use crate::project::model::Project;
use crate::task::model::Task;
use crate::Identity;

/// Administrator, owner, or listed member.
pub fn can_view_project(identity: &Identity, project: &Project) -> bool {
    identity.is_administrator || project.is_owner(&identity.id) || project.has_member(&identity.id)
}

/// Editing metadata and membership.
pub fn can_modify_project(identity: &Identity, project: &Project) -> bool {
    identity.is_administrator || project.is_owner(&identity.id)
}

pub fn can_create_task(identity: &Identity, project: &Project) -> bool {
    identity.is_administrator || project.is_owner(&identity.id)
}

/// Administrator or the task's assignee.
pub fn can_update_task(identity: &Identity, task: &Task) -> bool {
    identity.is_administrator || task.assigned_to == identity.id
}

/// Same as viewing the task's parent project. `project` must be that parent.
pub fn can_view_task(identity: &Identity, task: &Task, project: &Project) -> bool {
    task.project_id == project.id && can_view_project(identity, project)
}

/// Administrator or the owner of the task's parent project.
pub fn can_delete_task(identity: &Identity, task: &Task, project: &Project) -> bool {
    identity.is_administrator || (task.project_id == project.id && project.is_owner(&identity.id))
}

/// Anyone signed in may add accounts; only administrators may add administrators.
pub fn can_create_user(identity: &Identity, new_is_administrator: bool) -> bool {
    identity.is_administrator || !new_is_administrator
}

/// Editing or deleting an account: the account holder or an administrator.
pub fn can_modify_user(identity: &Identity, user_id: &str) -> bool {
    identity.is_administrator || identity.id == user_id
}

/// Turn a failed predicate into [`TrackerError::Forbidden`].
pub(crate) fn ensure(allowed: bool, action: &str) -> TrackerResult<()> {
    if allowed {
        Ok(())
    } else {
        Err(TrackerError::forbidden(format!("you are not allowed to {action}")))
    }
}
