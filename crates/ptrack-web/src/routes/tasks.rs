//! Task route handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use ptrack_core::task::{self, model::Task, model::TaskChanges};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateTaskRequest {
    pub project: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub assigned_to: String,
}

/// Body of POST /api/tasks/{id}/progress. Leaving out `completed` keeps the
/// stored flag.
#[derive(Deserialize)]
pub struct ProgressRequest {
    pub progress: i64,
    pub completed: Option<bool>,
}

#[derive(Deserialize)]
pub struct TaskFilter {
    pub project: Option<String>,
}

pub async fn list_tasks(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(filter): Query<TaskFilter>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state
        .run_as(&actor, move |db, actor| {
            task::list_tasks(db, actor, filter.project.as_deref())
        })
        .await?;
    tracing::info!(user = %actor.username, count = tasks.len(), "listed tasks");
    Ok(Json(tasks))
}

pub async fn get_task(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let task = state
        .run_as(&actor, move |db, actor| task::get_task(db, actor, &id))
        .await?;
    tracing::info!(user = %actor.username, task = %task.name, "retrieved task");
    Ok(Json(task))
}

pub async fn create_task(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(req) = payload?;
    let task = state
        .run_as(&actor, move |db, actor| {
            task::create_task(
                db,
                actor,
                &req.project,
                &req.name,
                &req.description,
                &req.assigned_to,
            )
        })
        .await?;
    tracing::info!(
        user = %actor.username,
        task = %task.name,
        project = %task.project_id,
        "created task"
    );
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<String>,
    payload: Result<Json<TaskChanges>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let Json(changes) = payload?;
    let task = state
        .run_as(&actor, move |db, actor| task::update_task(db, actor, &id, &changes))
        .await?;
    tracing::info!(user = %actor.username, task = %task.name, "updated task");
    Ok(Json(task))
}

/// POST /api/tasks/{id}/progress
pub async fn update_progress(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<String>,
    payload: Result<Json<ProgressRequest>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let Json(req) = payload?;
    let task = state
        .run_as(&actor, move |db, actor| {
            task::update_task_progress(db, actor, &id, req.progress, req.completed)
        })
        .await?;
    tracing::info!(
        user = %actor.username,
        task = %task.name,
        progress = task.progress,
        completed = task.completed,
        "updated task progress"
    );
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let task = state
        .run_as(&actor, move |db, actor| task::delete_task(db, actor, &id))
        .await?;
    tracing::info!(user = %actor.username, task = %task.name, "deleted task");
    Ok(StatusCode::NO_CONTENT)
}
