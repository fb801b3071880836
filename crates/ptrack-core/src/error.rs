//! Centralized error types for PTrack.

use ptrack_db::{DbError, DbResult};
use thiserror::Error;

/// Main error type for tracker operations.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

/// Coarse classification the access layer maps to response codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Authorization,
    NotFound,
    Authentication,
    Internal,
}

/// Result type for tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;

impl TrackerError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create an authorization error.
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ProjectNotFound(_) | Self::TaskNotFound(_) | Self::UserNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::Forbidden(_) => ErrorKind::Authorization,
            Self::AuthenticationFailed => ErrorKind::Authentication,
            Self::ValidationError(_) => ErrorKind::Validation,
            Self::Database(_) => ErrorKind::Internal,
        }
    }
}

/// Turns a row-level `DbError::NotFound` into the matching domain error.
pub(crate) trait OrNotFound<T> {
    fn or_not_found(self, err: impl FnOnce() -> TrackerError) -> TrackerResult<T>;
}

impl<T> OrNotFound<T> for DbResult<T> {
    fn or_not_found(self, err: impl FnOnce() -> TrackerError) -> TrackerResult<T> {
        self.map_err(|e| if e.is_not_found() { err() } else { e.into() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(TrackerError::validation("x").kind(), ErrorKind::Validation);
        assert_eq!(TrackerError::forbidden("x").kind(), ErrorKind::Authorization);
        assert_eq!(TrackerError::TaskNotFound("t".into()).kind(), ErrorKind::NotFound);
        assert_eq!(TrackerError::AuthenticationFailed.kind(), ErrorKind::Authentication);
        assert_eq!(TrackerError::Database(DbError::Lock).kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_or_not_found_maps_only_missing_rows() {
        let missing: DbResult<()> = Err(DbError::NotFound("Task: t1".into()));
        let err = missing
            .or_not_found(|| TrackerError::TaskNotFound("t1".into()))
            .unwrap_err();
        assert!(matches!(err, TrackerError::TaskNotFound(id) if id == "t1"));

        let other: DbResult<()> = Err(DbError::Lock);
        let err = other
            .or_not_found(|| TrackerError::TaskNotFound("t1".into()))
            .unwrap_err();
        assert!(matches!(err, TrackerError::Database(DbError::Lock)));
    }
}
