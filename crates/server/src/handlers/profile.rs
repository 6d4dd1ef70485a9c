//! # Profile Route Handlers
//!
//! Handlers for reading and updating the authenticated user's profile and
//! dietary preferences.

use super::{wrap_response, ApiResponse, AppError, AppState, DebugParams};
use crate::auth::middleware::AuthenticatedUser;
use crate::storage::{favorites, shopping_lists};
use crate::storage::shopping_lists::ShoppingList;
use axum::{
    extract::{Query, State},
    Json,
};
use pantrypal::Recipe;
use pantrypal_access as access;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
    pub dietary_preferences: Vec<String>,
    pub favorites: Vec<Recipe>,
    pub shopping_lists: Vec<ShoppingList>,
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct UpdatePreferencesRequest {
    pub preferences: Vec<String>,
}

/// Handler for fetching the user's profile, including their favorites and
/// shopping lists.
pub async fn get_profile_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    debug_params: Query<DebugParams>,
) -> Result<Json<ApiResponse<ProfileResponse>>, AppError> {
    let user = user.0;
    let favorites = favorites::list_favorites(&app_state.store.db, &user.id).await?;
    let lists = shopping_lists::list_lists(&app_state.store.db, &user.id).await?;

    let profile = ProfileResponse {
        id: user.id.clone(),
        name: user.display_name,
        email: user.identifier,
        dietary_preferences: user.dietary_preferences,
        favorites,
        shopping_lists: lists,
    };
    let debug_info = json!({ "userId": user.id });
    Ok(wrap_response(profile, debug_params, Some(debug_info)))
}

/// Handler for updating the user's display name and email identifier.
pub async fn update_profile_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    debug_params: Query<DebugParams>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    if payload.name.trim().len() < 2 {
        return Err(AppError::BadRequest(
            "Name must be at least 2 characters.".to_string(),
        ));
    }
    if !payload.email.contains('@') {
        return Err(AppError::BadRequest(
            "A valid email address is required.".to_string(),
        ));
    }
    info!(user_id = %user.0.id, "Updating profile");

    access::update_profile(&app_state.store.db, &user.0.id, &payload.name, &payload.email)
        .await?;

    Ok(wrap_response(
        json!({ "message": "Profile updated successfully" }),
        debug_params,
        None,
    ))
}

/// Handler for replacing the user's dietary preference list.
pub async fn update_dietary_preferences_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    debug_params: Query<DebugParams>,
    Json(payload): Json<UpdatePreferencesRequest>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    access::set_dietary_preferences(&app_state.store.db, &user.0.id, &payload.preferences)
        .await?;
    Ok(wrap_response(
        json!({ "message": "Dietary preferences updated successfully" }),
        debug_params,
        None,
    ))
}
