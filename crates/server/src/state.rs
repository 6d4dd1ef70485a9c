//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the
//! logic for building it at startup. The `AppState` holds all shared
//! resources, such as the configuration, the persistence store, and the
//! recipe source client, making them accessible to all request handlers.

use crate::config::AppConfig;
use crate::storage::Store;
use pantrypal::{FallbackPolicy, RecipeClient, RecipeClientBuilder};
use std::sync::Arc;
use tracing::{info, warn};

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration, loaded from `config.yml`.
    pub config: Arc<AppConfig>,
    /// The persistence store for users, favorites, and shopping lists.
    pub store: Arc<Store>,
    /// The client for the remote recipe source.
    pub recipes: Arc<RecipeClient>,
}

/// Builds the shared application state from the configuration.
///
/// This function initializes all necessary services:
/// - It sets up the SQLite store and ensures its schema exists.
/// - It instantiates the recipe source client with the configured fallback
///   policy and API key.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let store = Store::new(&config.db_url).await?;
    info!(db_path = %config.db_url, "Initialized local store (SQLite).");
    // Ensure the database schema is up-to-date on startup.
    store.initialize_schema().await?;

    let api_key = match (&config.recipe_api_key, config.fallback) {
        (Some(key), _) => key.clone(),
        (None, FallbackPolicy::Samples) => {
            // Without a key every upstream call fails, and the sample
            // fallback turns those failures into canned results. Useful for
            // local development.
            warn!("RECIPE_API_KEY is not set; search will serve sample recipes only.");
            "offline".to_string()
        }
        (None, FallbackPolicy::Empty) => {
            anyhow::bail!("RECIPE_API_KEY is required when the fallback policy is 'empty'")
        }
    };

    let recipes = RecipeClientBuilder::new()
        .api_url(&config.recipe_api_url)
        .api_key(&api_key)
        .fallback(config.fallback)
        .build()?;

    Ok(AppState {
        config: Arc::new(config),
        store: Arc::new(store),
        recipes: Arc::new(recipes),
    })
}
