use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Configuration options specific to the portfolio service.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Interface the HTTP server binds to.
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path of the SQLite database file.
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Cookie signing secret; at least 64 bytes.
    pub secret: String,
    /// Base URL of the hosted auth service used for sign-in links.
    pub auth_service_url: String,
    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,
    /// Root directory of the local blob store.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    /// Number of category snapshots buffered per subscriber.
    #[serde(default = "default_feed_capacity")]
    pub feed_capacity: usize,
}

fn default_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_database_url() -> String {
    "app.db".to_string()
}

fn default_templates_dir() -> String {
    "templates".to_string()
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

fn default_feed_capacity() -> usize {
    16
}

impl ServerConfig {
    /// Loads `config/default.yaml` (optional) overridden by `APP_*` variables.
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(Environment::with_prefix("APP"))
            .build()?
            .try_deserialize()
    }
}
