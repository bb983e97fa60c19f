//! HTTP routes of the admin API.

pub mod root;
pub mod stats;
pub mod users;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Build the API router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(root::router())
        .merge(users::router())
        .merge(stats::router())
}
