// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authenticated user profile endpoint.

use axum::{extract::State, Json};

use crate::{
    auth::Auth,
    error::ApiError,
    models::UserResponse,
    state::AppState,
    storage::{StorageError, UserRepository},
};

/// Get the authenticated user's own profile.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "The caller's profile", body = UserResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User record not found"),
    )
)]
pub async fn me(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<UserResponse>, ApiError> {
    let storage = state.storage();
    let repo = UserRepository::new(&storage);

    let stored = repo.get(&user.user_id).map_err(|e| match e {
        StorageError::NotFound(_) => ApiError::not_found("User not found"),
        other => ApiError::internal(format!("Failed to load user: {other}")),
    })?;

    Ok(Json(stored.into()))
}
