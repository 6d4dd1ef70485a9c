//! Shopping-list persistence. Every operation takes the acting user's id
//! and resolves rows through an ownership check, so a list or item the user
//! does not own surfaces as not-found.

use super::StoreError;
use serde::Serialize;
use turso::{params, Connection, Database, Row};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingList {
    pub id: String,
    pub name: String,
    pub items: Vec<ShoppingListItem>,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListItem {
    pub id: String,
    pub name: String,
    pub quantity: Option<String>,
    pub checked: bool,
    /// The source recipe this item came from, if any.
    pub recipe_id: Option<String>,
}

/// Fields of an item that a partial update may touch.
#[derive(Debug, Default)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub quantity: Option<Option<String>>,
    pub checked: Option<bool>,
}

/// An item to seed a new list with.
pub struct NewItem {
    pub name: String,
    pub quantity: Option<String>,
    pub recipe_id: Option<String>,
}

/// Creates a shopping list for the user, optionally seeded with items.
pub async fn create_list(
    db: &Database,
    user_id: &str,
    name: &str,
    items: Vec<NewItem>,
) -> Result<ShoppingList, StoreError> {
    let conn = db.connect()?;
    let list_id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO shopping_lists (id, user_id, name) VALUES (?, ?, ?)",
        params![list_id.clone(), user_id, name],
    )
    .await?;

    for item in items {
        insert_item(&conn, &list_id, &item).await?;
    }

    get_list(&conn, user_id, &list_id).await
}

/// Lists the user's shopping lists with their items, most recently updated
/// first.
pub async fn list_lists(db: &Database, user_id: &str) -> Result<Vec<ShoppingList>, StoreError> {
    let conn = db.connect()?;
    let mut rows = conn
        .query(
            "SELECT id FROM shopping_lists WHERE user_id = ? ORDER BY updated_at DESC, rowid DESC",
            params![user_id],
        )
        .await?;

    let mut ids = Vec::new();
    while let Some(row) = rows.next().await? {
        ids.push(row.get::<String>(0)?);
    }

    let mut lists = Vec::with_capacity(ids.len());
    for id in ids {
        lists.push(get_list(&conn, user_id, &id).await?);
    }
    Ok(lists)
}

/// Renames a list the user owns.
pub async fn rename_list(
    db: &Database,
    user_id: &str,
    list_id: &str,
    name: &str,
) -> Result<ShoppingList, StoreError> {
    let conn = db.connect()?;
    require_owned_list(&conn, user_id, list_id).await?;
    conn.execute(
        "UPDATE shopping_lists SET name = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        params![name, list_id],
    )
    .await?;
    get_list(&conn, user_id, list_id).await
}

/// Deletes a list the user owns, along with its items.
pub async fn delete_list(db: &Database, user_id: &str, list_id: &str) -> Result<(), StoreError> {
    let conn = db.connect()?;
    require_owned_list(&conn, user_id, list_id).await?;
    conn.execute(
        "DELETE FROM shopping_list_items WHERE list_id = ?",
        params![list_id],
    )
    .await?;
    conn.execute("DELETE FROM shopping_lists WHERE id = ?", params![list_id])
        .await?;
    Ok(())
}

/// Adds an item to a list the user owns.
pub async fn add_item(
    db: &Database,
    user_id: &str,
    list_id: &str,
    item: NewItem,
) -> Result<ShoppingListItem, StoreError> {
    let conn = db.connect()?;
    require_owned_list(&conn, user_id, list_id).await?;
    let item_id = insert_item(&conn, list_id, &item).await?;
    touch_list(&conn, list_id).await?;
    get_item(&conn, user_id, &item_id).await
}

/// Applies a partial update to an item on a list the user owns.
pub async fn update_item(
    db: &Database,
    user_id: &str,
    item_id: &str,
    update: ItemUpdate,
) -> Result<ShoppingListItem, StoreError> {
    let conn = db.connect()?;
    let current = get_item(&conn, user_id, item_id).await?;

    let name = update.name.unwrap_or(current.name);
    let quantity = update.quantity.unwrap_or(current.quantity);
    let checked = update.checked.unwrap_or(current.checked);

    conn.execute(
        "UPDATE shopping_list_items SET name = ?, quantity = ?, checked = ? WHERE id = ?",
        params![name, quantity, checked as i64, item_id],
    )
    .await?;

    let item = get_item(&conn, user_id, item_id).await?;
    let list_id: String = {
        let mut rows = conn
            .query(
                "SELECT list_id FROM shopping_list_items WHERE id = ?",
                params![item_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => row.get(0)?,
            None => return Err(StoreError::NotFound("Shopping list item")),
        }
    };
    touch_list(&conn, &list_id).await?;
    Ok(item)
}

/// Deletes an item from a list the user owns.
pub async fn delete_item(db: &Database, user_id: &str, item_id: &str) -> Result<(), StoreError> {
    let conn = db.connect()?;
    // Resolving the item through the ownership join doubles as the check.
    get_item(&conn, user_id, item_id).await?;
    conn.execute(
        "DELETE FROM shopping_list_items WHERE id = ?",
        params![item_id],
    )
    .await?;
    Ok(())
}

async fn insert_item(
    conn: &Connection,
    list_id: &str,
    item: &NewItem,
) -> Result<String, StoreError> {
    let item_id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO shopping_list_items (id, list_id, name, quantity, recipe_id)
         VALUES (?, ?, ?, ?, ?)",
        params![
            item_id.clone(),
            list_id,
            item.name.clone(),
            item.quantity.clone(),
            item.recipe_id.clone()
        ],
    )
    .await?;
    Ok(item_id)
}

async fn touch_list(conn: &Connection, list_id: &str) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE shopping_lists SET updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        params![list_id],
    )
    .await?;
    Ok(())
}

/// Fails with `NotFound` unless the list exists and belongs to the user.
async fn require_owned_list(
    conn: &Connection,
    user_id: &str,
    list_id: &str,
) -> Result<(), StoreError> {
    let owned = conn
        .query(
            "SELECT 1 FROM shopping_lists WHERE id = ? AND user_id = ? LIMIT 1",
            params![list_id, user_id],
        )
        .await?
        .next()
        .await?
        .is_some();
    if owned {
        Ok(())
    } else {
        Err(StoreError::NotFound("Shopping list"))
    }
}

async fn get_list(
    conn: &Connection,
    user_id: &str,
    list_id: &str,
) -> Result<ShoppingList, StoreError> {
    let mut rows = conn
        .query(
            "SELECT id, name, updated_at FROM shopping_lists
             WHERE id = ? AND user_id = ?",
            params![list_id, user_id],
        )
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or(StoreError::NotFound("Shopping list"))?;

    let mut list = ShoppingList {
        id: row.get(0)?,
        name: row.get(1)?,
        items: Vec::new(),
        updated_at: row.get(2)?,
    };

    let mut item_rows = conn
        .query(
            "SELECT id, name, quantity, checked, recipe_id
             FROM shopping_list_items WHERE list_id = ? ORDER BY rowid",
            params![list_id],
        )
        .await?;
    while let Some(row) = item_rows.next().await? {
        list.items.push(item_from_row(&row)?);
    }
    Ok(list)
}

/// Resolves an item through its parent list's ownership.
async fn get_item(
    conn: &Connection,
    user_id: &str,
    item_id: &str,
) -> Result<ShoppingListItem, StoreError> {
    let mut rows = conn
        .query(
            "SELECT i.id, i.name, i.quantity, i.checked, i.recipe_id
             FROM shopping_list_items i
             JOIN shopping_lists l ON l.id = i.list_id
             WHERE i.id = ? AND l.user_id = ?",
            params![item_id, user_id],
        )
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or(StoreError::NotFound("Shopping list item"))?;
    item_from_row(&row)
}

fn item_from_row(row: &Row) -> Result<ShoppingListItem, StoreError> {
    let quantity = match row.get_value(2)? {
        turso::Value::Text(s) => Some(s),
        _ => None,
    };
    let recipe_id = match row.get_value(4)? {
        turso::Value::Text(s) => Some(s),
        _ => None,
    };
    let checked: i64 = row.get(3)?;
    Ok(ShoppingListItem {
        id: row.get(0)?,
        name: row.get(1)?,
        quantity,
        checked: checked != 0,
        recipe_id,
    })
}
