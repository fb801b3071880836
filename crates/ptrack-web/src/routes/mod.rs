//! Route handlers.

pub mod projects;
pub mod tasks;
pub mod users;

/// GET /health - liveness check, no authentication.
pub async fn health() -> &'static str {
    "ok"
}
