//! Database query implementations.
//!
//! Every function takes a plain `&Connection` so it can run either directly
//! or inside a [`crate::DbPool::transaction`].

pub mod projects;
pub mod tasks;
pub mod users;

pub(crate) fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}
