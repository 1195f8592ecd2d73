//! User Handlers

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::application::dto::request::{ListUsersQuery, UpdateUserRequest};
use crate::application::dto::response::UserResponse;
use crate::application::services::AuthUser;
use crate::presentation::http::extractors::{PathParam, ValidatedJson, ValidatedQuery};
use crate::shared::error::AppError;
use crate::shared::pagination::Page;
use crate::startup::AppState;

/// List users, optionally filtered by name
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<ListUsersQuery>,
) -> Result<Json<Page<UserResponse>>, AppError> {
    let (filter, page) = query.into_parts();
    let users = state.users.list_users(filter, page).await?;

    Ok(Json(users.map(|user| {
        let own = user.id == auth.user_id;
        UserResponse::from_user(user, own)
    })))
}

/// Get current authenticated user
pub async fn get_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.users.get_user(auth.user_id).await?;

    Ok(Json(UserResponse::from_user(user, true)))
}

/// Get a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(user_id): PathParam<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.users.get_user(user_id).await?;

    Ok(Json(UserResponse::from_user(user, user_id == auth.user_id)))
}

/// Update the caller's own profile
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(user_id): PathParam<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .users
        .update_user(auth.user_id, user_id, body.into())
        .await?;

    Ok(Json(UserResponse::from_user(user, true)))
}

/// Soft delete the caller's own account
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(user_id): PathParam<Uuid>,
) -> Result<StatusCode, AppError> {
    state.users.delete_user(auth.user_id, user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
