//! Project completion percentage.

use crate::error::{OrNotFound, TrackerError, TrackerResult};
use ptrack_db::queries::{projects, tasks};
use ptrack_db::Connection;

/// `round(100 * completed / total)` with halves rounded up; 0 when `total` is 0.
pub fn percent_complete(completed: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total);
    ((200 * completed + total) / (2 * total)) as u8
}

/// Re-derive and store a project's progress from its current task set.
///
/// Reads the task counts through `conn`, so inside a transaction it sees
/// the write that triggered it.
pub fn recompute_project_progress(conn: &Connection, project_id: &str) -> TrackerResult<u8> {
    let counts = tasks::count_tasks(conn, project_id)?;
    let progress = percent_complete(counts.completed, counts.total);
    projects::set_progress(conn, project_id, i64::from(progress))
        .or_not_found(|| TrackerError::ProjectNotFound(project_id.to_string()))?;
    Ok(progress)
}
