//! # Recipe Route Handlers
//!
//! Handlers for the ingredient search and direct recipe lookup endpoints.

use super::{wrap_response, ApiResponse, AppError, AppState, DebugParams};
use crate::auth::middleware::AuthenticatedUser;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use pantrypal::Recipe;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub dietary_filters: Vec<String>,
    #[serde(default)]
    pub cuisine_filters: Vec<String>,
}

/// Handler for searching recipes by pantry ingredients.
pub async fn search_recipes_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    debug_params: Query<DebugParams>,
    Json(payload): Json<SearchRequest>,
) -> Result<Json<ApiResponse<Vec<Recipe>>>, AppError> {
    if payload.ingredients.is_empty() {
        return Err(AppError::BadRequest(
            "At least one ingredient is required.".to_string(),
        ));
    }
    info!(
        user_id = %user.0.id,
        "Received recipe search for {} ingredients",
        payload.ingredients.len()
    );

    let recipes = app_state
        .recipes
        .find_recipes_by_ingredients(
            &payload.ingredients,
            &payload.dietary_filters,
            &payload.cuisine_filters,
        )
        .await?;

    let debug_info = json!({
        "ingredients": payload.ingredients,
        "dietaryFilters": payload.dietary_filters,
        "cuisineFilters": payload.cuisine_filters,
        "candidates": recipes.len(),
    });
    Ok(wrap_response(recipes, debug_params, Some(debug_info)))
}

/// Handler for fetching one recipe by its source identifier.
pub async fn recipe_detail_handler(
    State(app_state): State<AppState>,
    debug_params: Query<DebugParams>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Recipe>>, AppError> {
    info!("Received recipe detail request for id: {id}");

    let recipe = app_state
        .recipes
        .get_recipe_by_id(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Recipe '{id}' not found.")))?;

    let debug_info = json!({ "id": id });
    Ok(wrap_response(recipe, debug_params, Some(debug_info)))
}
