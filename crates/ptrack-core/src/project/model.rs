//! Project domain models.

use ptrack_db::queries::projects::ProjectRow;
use serde::{Deserialize, Serialize};

/// A tracked project.
///
/// `progress` is derived from the project's tasks and is never accepted as
/// caller input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_by: String,
    pub members: Vec<String>,
    pub progress: u8,
}

impl Project {
    /// Create from database row and its member list.
    pub fn from_row(row: ProjectRow, members: Vec<String>) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            created_by: row.created_by,
            members,
            progress: row.progress.clamp(0, 100) as u8,
        }
    }

    pub fn is_owner(&self, user_id: &str) -> bool {
        self.created_by == user_id
    }

    pub fn has_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m == user_id)
    }
}

/// Metadata edits accepted by [`super::update_project`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changes_ignore_progress() {
        let changes: ProjectChanges =
            serde_json::from_str(r#"{"name": "Renamed", "progress": 99}"#).unwrap();
        assert_eq!(changes.name.as_deref(), Some("Renamed"));
        assert!(changes.description.is_none());
    }

    #[test]
    fn test_membership_helpers() {
        let project = Project {
            id: "p1".into(),
            name: "Launch".into(),
            description: String::new(),
            created_by: "owner".into(),
            members: vec!["a".into()],
            progress: 0,
        };
        assert!(project.is_owner("owner"));
        assert!(!project.has_member("owner"));
        assert!(project.has_member("a"));
    }
}
