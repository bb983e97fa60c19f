//! Iron Lady Admin API server.

use std::sync::Arc;

use admin_api::{app, logging, AppState, Config, FirebaseDirectory};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load().map_err(|e| {
        format!(
            "Failed to load configuration: {}. \
             Check config.toml and ADMIN__SECTION__KEY environment variables.",
            e
        )
    })?;

    logging::init(&config.logging.level);
    tracing::info!("Starting Iron Lady Admin API");

    if config.cors.is_permissive() {
        tracing::warn!(
            "CORS allows every origin with credentials and no request authentication is enforced; \
             set cors.allowed_origins to restrict access"
        );
    }

    // Connect to the user directory. Failure here stops startup.
    let directory = FirebaseDirectory::from_config(&config.firebase).map_err(|e| {
        tracing::error!("Firebase initialization failed: {}", e);
        format!("Firebase initialization failed: {}", e)
    })?;

    let addr = format!("{}:{}", config.api.host, config.api.port);
    let state = Arc::new(AppState::new(config, Arc::new(directory)));

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
