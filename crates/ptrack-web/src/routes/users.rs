//! User route handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use ptrack_core::user::{self, model::NewUser, model::User, model::UserChanges};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.run(|db| user::list_users(db)).await?;
    tracing::info!(user = %actor.username, count = users.len(), "listed users");
    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let found = state.run(move |db| user::get_user(db, &id)).await?;
    tracing::info!(user = %actor.username, target = %found.username, "retrieved user");
    Ok(Json(found))
}

pub async fn create_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let Json(req) = payload?;
    let created = state
        .run_as(&actor, move |db, actor| user::register_user(db, actor, &req))
        .await?;
    tracing::info!(user = %actor.username, created = %created.username, "created user");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT/PATCH /api/users/{id}, by the account holder or an administrator.
pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<String>,
    payload: Result<Json<UserChanges>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let Json(changes) = payload?;
    let updated = state
        .run_as(&actor, move |db, actor| user::update_user(db, actor, &id, &changes))
        .await?;
    tracing::info!(user = %actor.username, target = %updated.username, "updated user");
    Ok(Json(updated))
}

pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .run_as(&actor, move |db, actor| user::delete_user(db, actor, &id))
        .await?;
    tracing::info!(user = %actor.username, target = %deleted.username, "deleted user");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/signup - self-registration, no credentials required.
pub async fn sign_up(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let Json(req) = payload?;
    let created = state.run(move |db| user::sign_up(db, &req)).await?;
    tracing::info!(created = %created.username, "signed up");
    Ok((StatusCode::CREATED, Json(created)))
}
