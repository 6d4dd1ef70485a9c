//! # Configuration Tests
//!
//! Tests for the layered configuration loading: file defaults, YAML values,
//! and environment variable overrides.

use pantrypal_server::config::get_config;
use pantrypal::FallbackPolicy;
use std::env;
use std::fs::File;
use std::io::Write;
use std::sync::Mutex;
use tempfile::tempdir;

// A mutex to ensure that tests modifying the environment run sequentially.
// Environment variables are a shared, global resource, and the default test
// runner is parallel.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Clears every environment variable `get_config` reads, for a clean slate.
fn clear_env_vars() {
    env::remove_var("PORT");
    env::remove_var("DB_URL");
    env::remove_var("RECIPE_API_URL");
    env::remove_var("RECIPE_API_KEY");
    env::remove_var("FALLBACK");
    env::remove_var("JWT_SECRET");
}

#[test]
fn test_get_config_defaults_without_file() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();

    let config =
        get_config(Some("/nonexistent/config.yml")).expect("Configuration should load defaults");

    assert_eq!(config.port, 9090);
    assert_eq!(config.db_url, "db/pantrypal.db");
    assert_eq!(config.recipe_api_url, "https://api.spoonacular.com");
    assert_eq!(config.recipe_api_key, None);
    assert_eq!(config.fallback, FallbackPolicy::Empty);
    assert_eq!(config.jwt_secret, "a-secure-secret-key");

    clear_env_vars();
}

#[test]
fn test_get_config_reads_yaml_file() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();

    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yml");
    let mut file = File::create(&path).unwrap();
    file.write_all(
        br#"
port: 8123
db_url: "custom.db"
recipe_api_url: "http://localhost:9999"
recipe_api_key: "file-key"
fallback: "samples"
jwt_secret: "file-secret"
"#,
    )
    .unwrap();

    let config = get_config(path.to_str()).expect("Configuration should load from file");

    assert_eq!(config.port, 8123);
    assert_eq!(config.db_url, "custom.db");
    assert_eq!(config.recipe_api_url, "http://localhost:9999");
    assert_eq!(config.recipe_api_key, Some("file-key".to_string()));
    assert_eq!(config.fallback, FallbackPolicy::Samples);
    assert_eq!(config.jwt_secret, "file-secret");

    clear_env_vars();
}

#[test]
fn test_env_vars_override_file() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();

    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yml");
    let mut file = File::create(&path).unwrap();
    file.write_all(b"port: 8123\njwt_secret: \"file-secret\"\n").unwrap();

    env::set_var("PORT", "7777");
    env::set_var("JWT_SECRET", "env-secret");

    let config = get_config(path.to_str()).expect("Configuration should load");

    assert_eq!(config.port, 7777);
    assert_eq!(config.jwt_secret, "env-secret");

    clear_env_vars();
}

#[test]
fn test_recipe_api_key_falls_back_to_env() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();

    env::set_var("RECIPE_API_KEY", "env-key");

    let config = get_config(Some("/nonexistent/config.yml")).expect("Configuration should load");
    assert_eq!(config.recipe_api_key, Some("env-key".to_string()));

    clear_env_vars();
}
