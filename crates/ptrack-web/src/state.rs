//! Application state.

use ptrack_core::user::{DbUserDirectory, UserDirectory};
use ptrack_core::{Identity, TrackerResult};
use ptrack_db::DbPool;
use std::sync::Arc;

use crate::error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub directory: Arc<dyn UserDirectory>,
}

impl AppState {
    /// State whose directory is the database's own user table.
    pub fn new(db: Arc<DbPool>) -> Self {
        let directory = Arc::new(DbUserDirectory::new(db.clone()));
        Self { db, directory }
    }

    /// State authenticating against another directory.
    pub fn with_directory(db: Arc<DbPool>, directory: Arc<dyn UserDirectory>) -> Self {
        Self { db, directory }
    }

    /// Run a store call on the blocking thread pool.
    pub async fn run<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&DbPool) -> TrackerResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        run_blocking(move || f(&db)).await
    }

    /// [`AppState::run`] on behalf of an authenticated caller.
    pub async fn run_as<T, F>(&self, actor: &Identity, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&DbPool, &Identity) -> TrackerResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let actor = actor.clone();
        self.run(move |db| f(db, &actor)).await
    }
}

/// Move synchronous SQLite work off the async workers.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> TrackerResult<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(err) => {
            tracing::error!(error = %err, "blocking store call failed");
            Err(ApiError::internal())
        }
    }
}
