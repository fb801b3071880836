//! Task domain models.

use ptrack_db::queries::tasks::TaskRow;
use serde::{Deserialize, Serialize};

/// A unit of work inside one project.
///
/// `completed` and `progress` are set independently; neither implies the
/// other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub description: String,
    pub assigned_to: String,
    #[serde(rename = "project")]
    pub project_id: String,
    pub completed: bool,
    pub progress: u8,
}

impl Task {
    /// Create a Task from a database row.
    pub fn from_row(row: TaskRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            assigned_to: row.assigned_to,
            project_id: row.project_id,
            completed: row.completed,
            progress: row.progress.clamp(0, 100) as u8,
        }
    }
}

/// Edits accepted by [`super::update_task`].
///
/// `project` is accepted only so a request that repeats the current parent
/// passes; naming a different project is rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
    pub project: Option<String>,
    pub completed: Option<bool>,
    pub progress: Option<i64>,
}
