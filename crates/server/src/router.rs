use super::{handlers, state::AppState};
use axum::{
    routing::{get, patch, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/recipes/search", post(handlers::search_recipes_handler))
        .route("/recipes/{id}", get(handlers::recipe_detail_handler))
        .route("/favorites", get(handlers::list_favorites_handler))
        .route("/favorites/{id}", post(handlers::toggle_favorite_handler))
        .route(
            "/shopping-lists",
            get(handlers::list_shopping_lists_handler).post(handlers::create_shopping_list_handler),
        )
        .route(
            "/shopping-lists/from-recipe",
            post(handlers::create_list_from_recipe_handler),
        )
        .route(
            "/shopping-lists/{id}",
            patch(handlers::rename_shopping_list_handler)
                .delete(handlers::delete_shopping_list_handler),
        )
        .route(
            "/shopping-lists/{id}/items",
            post(handlers::create_list_item_handler),
        )
        .route(
            "/shopping-list-items/{id}",
            patch(handlers::update_list_item_handler).delete(handlers::delete_list_item_handler),
        )
        .route(
            "/profile",
            get(handlers::get_profile_handler).put(handlers::update_profile_handler),
        )
        .route(
            "/profile/dietary-preferences",
            put(handlers::update_dietary_preferences_handler),
        )
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
