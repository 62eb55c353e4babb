//! Application configuration loaded from environment variables and config files.
//!
//! Supports `.env` files for development and environment variables for production.
//! Config precedence: env vars > .env file > config file > defaults

use serde::Deserialize;

/// Config file looked up when no explicit path is given. Any extension the
/// `config` crate understands is accepted (`config.toml`, `config.yaml`, ...).
pub const DEFAULT_CONFIG_FILE: &str = "config";

/// Initialize the application configuration from the environment.
///
/// Loads `.env` first so its values are visible to the environment source.
pub fn init(path: Option<&str>) -> Result<AppConfig, config::ConfigError> {
    // Load .env file if present (development)
    let _ = dotenvy::dotenv();
    load(path)
}

/// Build the configuration from defaults, the optional config file and
/// `ENTITY_FILES__*` environment variables.
pub fn load(path: Option<&str>) -> Result<AppConfig, config::ConfigError> {
    let cfg = config::Config::builder()
        // Defaults
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("storage.backend", "local")?
        .set_default("storage.data_dir", "./data/files")?
        .set_default("storage.endpoint", "")?
        .set_default("storage.bucket", "entity-files")?
        .set_default("storage.access_key", "")?
        .set_default("storage.secret_key", "")?
        .set_default("storage.region", "us-east-1")?
        .set_default("storage.key_prefix", "")?
        .set_default("log.format", "pretty")?
        // Optional config file
        .add_source(config::File::with_name(path.unwrap_or(DEFAULT_CONFIG_FILE)).required(false))
        // Environment variables (ENTITY_FILES__SERVER__PORT, ENTITY_FILES__STORAGE__BACKEND, etc.)
        .add_source(
            config::Environment::with_prefix("ENTITY_FILES")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    cfg.try_deserialize()
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Which `FileLookup` implementation backs the service.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Files under `data_dir/<entity_id>/<file_name>`.
    Local,
    /// S3 / MinIO bucket.
    S3,
    /// Process memory; starts empty. Development only.
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Root directory for the local backend (default: ./data/files).
    pub data_dir: String,
    /// S3 endpoint URL (e.g., http://localhost:9000 for MinIO).
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    /// Region (use `us-east-1` for MinIO)
    pub region: String,
    /// Prepended to every object key, e.g. `announcements/`.
    pub key_prefix: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
}
