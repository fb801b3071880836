//! Project route handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use ptrack_core::project::{self, model::Project, model::ProjectChanges};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub members: Vec<String>,
}

#[derive(Deserialize)]
pub struct AddMemberRequest {
    pub user: String,
}

pub async fn list_projects(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Vec<Project>>, ApiError> {
    let projects = state
        .run_as(&actor, |db, actor| project::list_projects(db, actor))
        .await?;
    tracing::info!(user = %actor.username, count = projects.len(), "listed projects");
    Ok(Json(projects))
}

pub async fn get_project(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Project>, ApiError> {
    let project = state
        .run_as(&actor, move |db, actor| project::get_project(db, actor, &id))
        .await?;
    tracing::info!(user = %actor.username, project = %project.name, "retrieved project");
    Ok(Json(project))
}

pub async fn create_project(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    payload: Result<Json<CreateProjectRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let Json(req) = payload?;
    let project = state
        .run_as(&actor, move |db, actor| {
            project::create_project(db, actor, &req.name, &req.description, &req.members)
        })
        .await?;
    tracing::info!(user = %actor.username, project = %project.name, "created project");
    Ok((StatusCode::CREATED, Json(project)))
}

/// PUT/PATCH /api/projects/{id}. A `progress` field in the body is ignored.
pub async fn update_project(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<String>,
    payload: Result<Json<ProjectChanges>, JsonRejection>,
) -> Result<Json<Project>, ApiError> {
    let Json(changes) = payload?;
    let project = state
        .run_as(&actor, move |db, actor| {
            project::update_project(db, actor, &id, &changes)
        })
        .await?;
    tracing::info!(user = %actor.username, project = %project.name, "updated project");
    Ok(Json(project))
}

pub async fn delete_project(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let project = state
        .run_as(&actor, move |db, actor| project::delete_project(db, actor, &id))
        .await?;
    tracing::info!(user = %actor.username, project = %project.name, "deleted project");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_member(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<String>,
    payload: Result<Json<AddMemberRequest>, JsonRejection>,
) -> Result<Json<Project>, ApiError> {
    let Json(req) = payload?;
    let member = req.user.clone();
    let project = state
        .run_as(&actor, move |db, actor| {
            project::add_member(db, actor, &id, &req.user)
        })
        .await?;
    tracing::info!(
        user = %actor.username,
        project = %project.name,
        member = %member,
        "added member"
    );
    Ok(Json(project))
}

pub async fn remove_member(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path((id, user_id)): Path<(String, String)>,
) -> Result<Json<Project>, ApiError> {
    let member = user_id.clone();
    let project = state
        .run_as(&actor, move |db, actor| {
            project::remove_member(db, actor, &id, &user_id)
        })
        .await?;
    tracing::info!(
        user = %actor.username,
        project = %project.name,
        member = %member,
        "removed member"
    );
    Ok(Json(project))
}
