//! Aggregate user statistics endpoint.

use std::sync::Arc;

use admin_common::UserStats;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Local;

use crate::directory::fetch_all_users;
use crate::error::{ApiError, Result};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/stats", get(get_stats))
}

/// GET /stats - Counts over the full listing, "this month" in server-local time.
async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<UserStats>> {
    let users = fetch_all_users(state.directory.as_ref())
        .await
        .map_err(|e| {
            tracing::error!("Failed to compute user stats: {}", e);
            ApiError::Internal(e.to_string())
        })?;

    Ok(Json(UserStats::compute(&users, &Local::now())))
}
