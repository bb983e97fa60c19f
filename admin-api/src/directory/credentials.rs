//! Google service account key files.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::InitError;

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// The fields of a service account key JSON file that the directory needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub key_type: String,
    pub project_id: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    /// Read and validate a key file.
    pub fn from_file(path: &Path) -> Result<Self, InitError> {
        let raw = fs::read_to_string(path).map_err(|source| InitError::ReadCredentials {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, InitError> {
        let key: Self = serde_json::from_str(raw)?;

        if key.key_type != "service_account" {
            return Err(InitError::InvalidCredentials(format!(
                "expected type \"service_account\", got \"{}\"",
                key.key_type
            )));
        }
        if key.project_id.is_empty() {
            return Err(InitError::InvalidCredentials("project_id is empty".to_string()));
        }
        if key.client_email.is_empty() {
            return Err(InitError::InvalidCredentials("client_email is empty".to_string()));
        }

        Ok(key)
    }
}
