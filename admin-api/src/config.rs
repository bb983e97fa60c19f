//! Configuration for the admin API.

use std::env;
use std::path::Path;

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

/// Environment variable the Firebase SDKs read to target the Auth emulator.
pub const EMULATOR_HOST_ENV: &str = "FIREBASE_AUTH_EMULATOR_HOST";

/// Main configuration structure for the admin API.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub firebase: FirebaseConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Firebase user directory connection.
#[derive(Debug, Clone, Deserialize)]
pub struct FirebaseConfig {
    /// Path to the service account key JSON file.
    #[serde(default = "default_credentials_path")]
    pub credentials_path: String,
    /// Overrides the project id from the key file. Required in emulator mode.
    #[serde(default)]
    pub project_id: Option<String>,
    /// `host:port` of a running Auth emulator. Disables credential loading.
    #[serde(default)]
    pub emulator_host: Option<String>,
    /// Identity Toolkit base URL, up to and including the version segment.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Users requested per listing page (1..=1000).
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            credentials_path: default_credentials_path(),
            project_id: None,
            emulator_host: None,
            api_base_url: default_api_base_url(),
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins. `["*"]` mirrors any origin and allows credentials.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn is_permissive(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_credentials_path() -> String {
    "serviceAccountKey.json".to_string()
}
fn default_api_base_url() -> String {
    "https://identitytoolkit.googleapis.com/v1".to_string()
}
fn default_page_size() -> u32 {
    1000
}
fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Configuration sources (in order of precedence):
    /// 1. Environment variables (ADMIN__SECTION__KEY format)
    /// 2. config.toml file (if present)
    /// 3. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("ADMIN")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins"),
            )
            .build()?;

        let mut config: Self = config.try_deserialize()?;
        config.apply_emulator_env(env::var(EMULATOR_HOST_ENV).ok());
        Ok(config)
    }

    /// Load configuration from a single file, without environment overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        ConfigLoader::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize()
    }

    /// Fall back to the SDK-wide emulator variable when no emulator host is configured.
    fn apply_emulator_env(&mut self, emulator_host: Option<String>) {
        if self.firebase.emulator_host.is_none() {
            self.firebase.emulator_host = emulator_host.filter(|h| !h.is_empty());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_api_config() {
        let api = ApiConfig::default();
        assert_eq!(api.host, "0.0.0.0");
        assert_eq!(api.port, 8000);
    }

    #[test]
    fn test_default_firebase_config() {
        let firebase = FirebaseConfig::default();
        assert_eq!(firebase.credentials_path, "serviceAccountKey.json");
        assert_eq!(firebase.page_size, 1000);
        assert!(firebase.project_id.is_none());
        assert!(firebase.emulator_host.is_none());
    }

    #[test]
    fn test_default_cors_is_permissive() {
        assert!(CorsConfig::default().is_permissive());
        let restricted = CorsConfig {
            allowed_origins: vec!["https://admin.example.com".to_string()],
        };
        assert!(!restricted.is_permissive());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[api]
port = 9090

[firebase]
project_id = "iron-lady"
page_size = 250

[cors]
allowed_origins = ["https://admin.example.com"]
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.api.port, 9090);
        assert_eq!(config.firebase.project_id.as_deref(), Some("iron-lady"));
        assert_eq!(config.firebase.page_size, 250);
        assert_eq!(config.firebase.credentials_path, "serviceAccountKey.json");
        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://admin.example.com".to_string()]
        );
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_environment_overrides_defaults() {
        // The only test in this crate that reads ADMIN__* variables.
        let vars = [
            ("ADMIN__API__PORT", "9001"),
            ("ADMIN__FIREBASE__PROJECT_ID", "12345"),
            ("ADMIN__CORS__ALLOWED_ORIGINS", "https://a.example.com,https://b.example.com"),
        ];
        for (key, value) in vars {
            env::set_var(key, value);
        }

        let loaded = Config::load();

        for (key, _) in vars {
            env::remove_var(key);
        }

        let config = loaded.unwrap();
        assert_eq!(config.api.port, 9001);
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.firebase.project_id.as_deref(), Some("12345"));
        assert_eq!(config.firebase.page_size, 1000);
        assert_eq!(
            config.cors.allowed_origins,
            vec![
                "https://a.example.com".to_string(),
                "https://b.example.com".to_string()
            ]
        );
        assert!(!config.cors.is_permissive());
    }

    #[test]
    fn test_emulator_env_fallback() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[logging]\nlevel = \"debug\"").unwrap();
        let mut config = Config::load_from(file.path()).unwrap();

        config.apply_emulator_env(Some(String::new()));
        assert!(config.firebase.emulator_host.is_none());

        config.apply_emulator_env(Some("localhost:9099".to_string()));
        assert_eq!(config.firebase.emulator_host.as_deref(), Some("localhost:9099"));

        // An explicitly configured host wins over the environment.
        config.apply_emulator_env(Some("other:1".to_string()));
        assert_eq!(config.firebase.emulator_host.as_deref(), Some("localhost:9099"));
    }
}
