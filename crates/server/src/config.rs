//! # Application Configuration
//!
//! This module defines the configuration structure for the
//! `pantrypal-server` and provides the logic for loading it from a
//! `config.yml` file and environment variables.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use pantrypal::FallbackPolicy;
use serde::Deserialize;
use std::env;
use std::fs;
use tracing::info;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The path to the SQLite database file. Loaded from `DB_URL` env var.
    #[serde(default = "default_db_url")]
    pub db_url: String,
    /// The base URL of the remote recipe source.
    #[serde(default = "default_recipe_api_url")]
    pub recipe_api_url: String,
    /// The recipe source API key. Loaded from `RECIPE_API_KEY` env var.
    #[serde(default)]
    pub recipe_api_key: Option<String>,
    /// What a search returns when the recipe source fails
    /// ("empty" or "samples").
    #[serde(default)]
    pub fallback: FallbackPolicy,
    /// The secret used to validate session tokens. Loaded from `JWT_SECRET`.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
}

fn default_port() -> u16 {
    9090
}

fn default_db_url() -> String {
    "db/pantrypal.db".to_string()
}

fn default_recipe_api_url() -> String {
    pantrypal::types::DEFAULT_API_URL.to_string()
}

fn default_jwt_secret() -> String {
    "a-secure-secret-key".to_string()
}

/// Loads the application configuration from a file and environment variables.
///
/// The optional `config.yml` next to the crate manifest forms the base
/// layer. Environment variables override it: top-level keys map directly
/// (`PORT`, `DB_URL`, `JWT_SECRET`), and `PANTRYPAL_`-prefixed variables are
/// parsed for deeper overrides.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder();

    let config_path = config_path_override
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}/config.yml", env!("CARGO_MANIFEST_DIR")));

    if std::path::Path::new(&config_path).exists() {
        info!("Loading configuration from '{config_path}'.");
        let content = fs::read_to_string(&config_path).map_err(|e| {
            ConfigError::General(format!("Failed to read config file '{config_path}': {e}"))
        })?;
        builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
    }

    let settings = builder
        .add_source(Environment::default())
        .add_source(
            Environment::with_prefix("PANTRYPAL")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;

    // The API key usually arrives through the environment rather than the
    // config file. Check for it explicitly so loading stays robust.
    if config.recipe_api_key.is_none() {
        if let Ok(key) = env::var("RECIPE_API_KEY") {
            if !key.is_empty() {
                config.recipe_api_key = Some(key);
            }
        }
    }

    Ok(config)
}
