//! # Shopping List Route Handlers
//!
//! Ownership-checked CRUD over shopping lists and their items, plus the
//! "create a list from a recipe's ingredients" convenience endpoint.

use super::{wrap_response, ApiResponse, AppError, AppState, DebugParams};
use crate::auth::middleware::AuthenticatedUser;
use crate::storage::shopping_lists::{
    self, ItemUpdate, NewItem, ShoppingList, ShoppingListItem,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

// --- API Payloads ---

#[derive(Deserialize)]
pub struct CreateListRequest {
    pub name: String,
    /// Optional item names to seed the list with.
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListFromRecipeRequest {
    pub recipe_id: String,
    /// Overrides the default "Ingredients for {title}" name.
    pub name: Option<String>,
}

#[derive(Deserialize)]
pub struct RenameListRequest {
    pub name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub name: String,
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default)]
    pub recipe_id: Option<String>,
}

/// Partial update: absent fields are left untouched. `quantity` is
/// double-optional so a caller can clear it with an explicit `null`.
#[derive(Deserialize)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub quantity: Option<Option<String>>,
    pub checked: Option<bool>,
}

/// Distinguishes an absent field from an explicit `null`.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// --- List Handlers ---

/// Handler for listing the user's shopping lists.
pub async fn list_shopping_lists_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    debug_params: Query<DebugParams>,
) -> Result<Json<ApiResponse<Vec<ShoppingList>>>, AppError> {
    let lists = shopping_lists::list_lists(&app_state.store.db, &user.0.id).await?;
    let debug_info = json!({ "userId": user.0.id, "count": lists.len() });
    Ok(wrap_response(lists, debug_params, Some(debug_info)))
}

/// Handler for creating a shopping list.
pub async fn create_shopping_list_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    debug_params: Query<DebugParams>,
    Json(payload): Json<CreateListRequest>,
) -> Result<Json<ApiResponse<ShoppingList>>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("A list name is required.".to_string()));
    }
    info!(user_id = %user.0.id, "Creating shopping list '{}'", payload.name);

    let items = payload
        .items
        .into_iter()
        .map(|name| NewItem {
            name,
            quantity: None,
            recipe_id: None,
        })
        .collect();
    let list =
        shopping_lists::create_list(&app_state.store.db, &user.0.id, &payload.name, items).await?;
    Ok(wrap_response(list, debug_params, None))
}

/// Handler for creating a shopping list from a recipe's ingredient lines.
pub async fn create_list_from_recipe_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    debug_params: Query<DebugParams>,
    Json(payload): Json<CreateListFromRecipeRequest>,
) -> Result<Json<ApiResponse<ShoppingList>>, AppError> {
    let recipe_id = payload.recipe_id;
    let recipe = app_state
        .recipes
        .get_recipe_by_id(&recipe_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Recipe '{recipe_id}' not found.")))?;

    let name = payload
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| format!("Ingredients for {}", recipe.title));

    let items = recipe
        .ingredients
        .iter()
        .map(|ingredient| NewItem {
            name: ingredient.clone(),
            quantity: None,
            recipe_id: Some(recipe_id.clone()),
        })
        .collect();

    let list = shopping_lists::create_list(&app_state.store.db, &user.0.id, &name, items).await?;
    let debug_info = json!({ "recipeId": recipe_id, "items": list.items.len() });
    Ok(wrap_response(list, debug_params, Some(debug_info)))
}

/// Handler for renaming a shopping list.
pub async fn rename_shopping_list_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    debug_params: Query<DebugParams>,
    Path(id): Path<String>,
    Json(payload): Json<RenameListRequest>,
) -> Result<Json<ApiResponse<ShoppingList>>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("A list name is required.".to_string()));
    }
    let list =
        shopping_lists::rename_list(&app_state.store.db, &user.0.id, &id, &payload.name).await?;
    Ok(wrap_response(list, debug_params, None))
}

/// Handler for deleting a shopping list and its items.
pub async fn delete_shopping_list_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    debug_params: Query<DebugParams>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    shopping_lists::delete_list(&app_state.store.db, &user.0.id, &id).await?;
    Ok(wrap_response(
        json!({ "message": "Shopping list deleted successfully" }),
        debug_params,
        None,
    ))
}

// --- Item Handlers ---

/// Handler for adding an item to a shopping list.
pub async fn create_list_item_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    debug_params: Query<DebugParams>,
    Path(id): Path<String>,
    Json(payload): Json<CreateItemRequest>,
) -> Result<Json<ApiResponse<ShoppingListItem>>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "An item name is required.".to_string(),
        ));
    }
    let item = shopping_lists::add_item(
        &app_state.store.db,
        &user.0.id,
        &id,
        NewItem {
            name: payload.name,
            quantity: payload.quantity,
            recipe_id: payload.recipe_id,
        },
    )
    .await?;
    Ok(wrap_response(item, debug_params, None))
}

/// Handler for partially updating a shopping list item.
pub async fn update_list_item_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    debug_params: Query<DebugParams>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateItemRequest>,
) -> Result<Json<ApiResponse<ShoppingListItem>>, AppError> {
    if let Some(name) = &payload.name {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest(
                "An item name cannot be empty.".to_string(),
            ));
        }
    }
    let item = shopping_lists::update_item(
        &app_state.store.db,
        &user.0.id,
        &id,
        ItemUpdate {
            name: payload.name,
            quantity: payload.quantity,
            checked: payload.checked,
        },
    )
    .await?;
    Ok(wrap_response(item, debug_params, None))
}

/// Handler for deleting a shopping list item.
pub async fn delete_list_item_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    debug_params: Query<DebugParams>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    shopping_lists::delete_item(&app_state.store.db, &user.0.id, &id).await?;
    Ok(wrap_response(
        json!({ "message": "Item deleted successfully" }),
        debug_params,
        None,
    ))
}
