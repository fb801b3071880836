//! PTrack Database Layer
//!
//! SQLite persistence for users, projects, memberships and tasks.

pub mod migrations;
pub mod pool;
pub mod queries;

pub use pool::{DbError, DbPool, DbResult};
pub use rusqlite::Connection;

/// Open (or create) the database file at `path` with migrations applied.
pub fn init_pool(path: &std::path::Path) -> DbResult<DbPool> {
    DbPool::open(path)
}
