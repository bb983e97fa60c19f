//! Iron Lady Admin API - read-only HTTP facade over the Firebase user directory.

pub mod config;
pub mod directory;
pub mod error;
pub mod logging;
pub mod routes;
pub mod state;
pub mod test_util;

pub use config::Config;
pub use directory::{FirebaseDirectory, UserDirectory};
pub use error::{ApiError, DirectoryError, InitError};
pub use state::AppState;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::{middleware, Router};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::CorsConfig;

/// Build the full application: routes, CORS and request logging.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors);

    Router::new()
        .merge(routes::router())
        .layer(cors)
        .layer(middleware::from_fn(logging::request_logger))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `["*"]` mirrors any origin with credentials; otherwise only listed origins pass.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.is_permissive() {
        return CorsLayer::very_permissive();
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
