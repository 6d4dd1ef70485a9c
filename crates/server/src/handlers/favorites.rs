//! # Favorites Route Handlers
//!
//! Handlers for favoriting recipes. The first time a recipe is favorited a
//! normalized copy is cached locally, so the favorites page never depends
//! on the remote source.

use super::{wrap_response, ApiResponse, AppError, AppState, DebugParams};
use crate::auth::middleware::AuthenticatedUser;
use crate::storage::favorites;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use pantrypal::Recipe;
use serde::Serialize;
use serde_json::json;
use tracing::info;

#[derive(Serialize)]
pub struct ToggleFavoriteResponse {
    pub favorited: bool,
}

/// Handler for toggling a recipe in the user's favorites.
pub async fn toggle_favorite_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    debug_params: Query<DebugParams>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ToggleFavoriteResponse>>, AppError> {
    let user_id = &user.0.id;
    info!(user_id = %user_id, recipe_id = %id, "Received favorite toggle");

    if !favorites::is_cached(&app_state.store.db, &id).await? {
        let recipe = app_state
            .recipes
            .get_recipe_by_id(&id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Recipe '{id}' not found.")))?;
        favorites::cache_recipe(&app_state.store.db, &recipe).await?;
    }

    let favorited = favorites::toggle_favorite(&app_state.store.db, user_id, &id).await?;

    let debug_info = json!({ "recipeId": id, "userId": user_id });
    Ok(wrap_response(
        ToggleFavoriteResponse { favorited },
        debug_params,
        Some(debug_info),
    ))
}

/// Handler for listing the user's favorited recipes.
pub async fn list_favorites_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    debug_params: Query<DebugParams>,
) -> Result<Json<ApiResponse<Vec<Recipe>>>, AppError> {
    let recipes = favorites::list_favorites(&app_state.store.db, &user.0.id).await?;
    let debug_info = json!({ "userId": user.0.id, "count": recipes.len() });
    Ok(wrap_response(recipes, debug_params, Some(debug_info)))
}
