//! Shared application state.

use std::sync::Arc;

use crate::config::Config;
use crate::directory::UserDirectory;

/// Shared application state passed to all handlers.
pub struct AppState {
    pub config: Config,
    pub directory: Arc<dyn UserDirectory>,
}

impl AppState {
    pub fn new(config: Config, directory: Arc<dyn UserDirectory>) -> Self {
        Self { config, directory }
    }
}
