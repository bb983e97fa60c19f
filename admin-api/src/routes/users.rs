//! User listing and lookup endpoints.

use std::sync::Arc;

use admin_common::{ListUsersResponse, UserRecord};
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::directory::fetch_all_users;
use crate::error::{ApiError, DirectoryError, Result};
use crate::state::AppState;

/// Build the users router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:user_id", get(get_user))
}

/// GET /users - Every user in the directory, across all pages.
async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<ListUsersResponse>> {
    let users = fetch_all_users(state.directory.as_ref())
        .await
        .map_err(|e| {
            tracing::error!("Failed to list users: {}", e);
            ApiError::Internal(format!("Error fetching users: {}", e))
        })?;

    Ok(Json(ListUsersResponse::new(users)))
}

/// GET /users/:user_id - A single user, returned flat.
async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserRecord>> {
    match state.directory.get_user(&user_id).await {
        Ok(user) => Ok(Json(user)),
        Err(DirectoryError::NotFound(_)) => {
            tracing::debug!("User {} not found", user_id);
            Err(ApiError::NotFound("User not found".to_string()))
        }
        Err(e) => {
            tracing::error!("Failed to fetch user {}: {}", user_id, e);
            Err(ApiError::Internal(e.to_string()))
        }
    }
}
