//! Favorite-recipe persistence: a cached copy of each favorited recipe plus
//! the per-user membership rows.

use super::StoreError;
use pantrypal::Recipe;
use turso::{params, Database, Row};

/// Caches a normalized recipe, keyed by its source id. Re-favoriting an
/// already cached recipe leaves the existing copy in place.
pub async fn cache_recipe(db: &Database, recipe: &Recipe) -> Result<(), StoreError> {
    let conn = db.connect()?;
    conn.execute(
        "INSERT OR IGNORE INTO recipes
            (id, title, description, image, cook_time, servings, cuisine,
             ingredients, instructions, dietary_tags)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            recipe.id.clone(),
            recipe.title.clone(),
            recipe.description.clone(),
            recipe.image.clone(),
            recipe.cook_time as i64,
            recipe.servings as i64,
            recipe.cuisine.clone(),
            encode_list(&recipe.ingredients)?,
            encode_list(&recipe.instructions)?,
            encode_list(&recipe.dietary_tags)?,
        ],
    )
    .await?;
    Ok(())
}

/// Returns whether a cached copy of the recipe exists.
pub async fn is_cached(db: &Database, recipe_id: &str) -> Result<bool, StoreError> {
    let conn = db.connect()?;
    let found = conn
        .query(
            "SELECT 1 FROM recipes WHERE id = ? LIMIT 1",
            params![recipe_id],
        )
        .await?
        .next()
        .await?
        .is_some();
    Ok(found)
}

/// Flips a recipe's membership in the user's favorites. Returns the new
/// state: `true` if the recipe is now favorited.
pub async fn toggle_favorite(
    db: &Database,
    user_id: &str,
    recipe_id: &str,
) -> Result<bool, StoreError> {
    let conn = db.connect()?;
    let favorited = conn
        .query(
            "SELECT 1 FROM favorites WHERE user_id = ? AND recipe_id = ? LIMIT 1",
            params![user_id, recipe_id],
        )
        .await?
        .next()
        .await?
        .is_some();

    if favorited {
        conn.execute(
            "DELETE FROM favorites WHERE user_id = ? AND recipe_id = ?",
            params![user_id, recipe_id],
        )
        .await?;
        Ok(false)
    } else {
        conn.execute(
            "INSERT INTO favorites (user_id, recipe_id) VALUES (?, ?)",
            params![user_id, recipe_id],
        )
        .await?;
        Ok(true)
    }
}

/// Lists the user's favorited recipes, most recently favorited first.
pub async fn list_favorites(db: &Database, user_id: &str) -> Result<Vec<Recipe>, StoreError> {
    let conn = db.connect()?;
    let mut rows = conn
        .query(
            "SELECT r.id, r.title, r.description, r.image, r.cook_time,
                    r.servings, r.cuisine, r.ingredients, r.instructions,
                    r.dietary_tags
             FROM favorites f
             JOIN recipes r ON r.id = f.recipe_id
             WHERE f.user_id = ?
             ORDER BY f.created_at DESC",
            params![user_id],
        )
        .await?;

    let mut recipes = Vec::new();
    while let Some(row) = rows.next().await? {
        recipes.push(recipe_from_row(&row)?);
    }
    Ok(recipes)
}

fn recipe_from_row(row: &Row) -> Result<Recipe, StoreError> {
    let cook_time: i64 = row.get(4)?;
    let servings: i64 = row.get(5)?;
    Ok(Recipe {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        image: row.get(3)?,
        cook_time: cook_time as u32,
        servings: servings as u32,
        cuisine: row.get(6)?,
        ingredients: decode_list(&row.get::<String>(7)?)?,
        instructions: decode_list(&row.get::<String>(8)?)?,
        // The cached copy was produced by a direct lookup, so the sentinel
        // match fields apply.
        match_percentage: 100,
        matched_ingredients: Vec::new(),
        missing_ingredients: Vec::new(),
        dietary_tags: decode_list(&row.get::<String>(9)?)?,
    })
}

fn encode_list(list: &[String]) -> Result<String, StoreError> {
    serde_json::to_string(list)
        .map_err(|e| StoreError::DataIntegrity(format!("Failed to encode list: {e}")))
}

fn decode_list(json: &str) -> Result<Vec<String>, StoreError> {
    serde_json::from_str(json)
        .map_err(|e| StoreError::DataIntegrity(format!("Failed to decode list: {e}")))
}
