//! Liveness endpoint.

use std::sync::Arc;

use admin_common::RootResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Local;

use crate::state::AppState;

pub const ROOT_MESSAGE: &str = "Iron Lady Admin API is running";

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(root))
}

/// GET / - Static message plus server-local time. Never touches the directory.
async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: ROOT_MESSAGE.to_string(),
        timestamp: Local::now()
            .naive_local()
            .format("%Y-%m-%dT%H:%M:%S%.6f")
            .to_string(),
    })
}
