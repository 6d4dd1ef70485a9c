//! # Schema Definition
//!
//! This module centralizes the SQL statements that create the application's
//! tables and indexes. Every statement is idempotent, so the whole set is
//! safe to run on each startup.

pub const ALL_TABLE_CREATION_SQL: &[&str] = &[
    // Users, keyed by a deterministic UUIDv5 of the external identifier.
    "CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        identifier TEXT NOT NULL UNIQUE,
        display_name TEXT,
        dietary_preferences TEXT,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    // Cached copies of favorited recipes, keyed by the source id. The list
    // columns (ingredients, instructions, dietary_tags) hold JSON arrays.
    "CREATE TABLE IF NOT EXISTS recipes (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        image TEXT NOT NULL,
        cook_time INTEGER NOT NULL,
        servings INTEGER NOT NULL,
        cuisine TEXT NOT NULL,
        ingredients TEXT NOT NULL,
        instructions TEXT NOT NULL,
        dietary_tags TEXT NOT NULL,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS favorites (
        user_id TEXT NOT NULL,
        recipe_id TEXT NOT NULL,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        PRIMARY KEY (user_id, recipe_id)
    )",
    "CREATE TABLE IF NOT EXISTS shopping_lists (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        name TEXT NOT NULL,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS shopping_list_items (
        id TEXT PRIMARY KEY,
        list_id TEXT NOT NULL,
        name TEXT NOT NULL,
        quantity TEXT,
        checked INTEGER NOT NULL DEFAULT 0,
        recipe_id TEXT,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE INDEX IF NOT EXISTS idx_favorites_user ON favorites (user_id)",
    "CREATE INDEX IF NOT EXISTS idx_shopping_lists_user ON shopping_lists (user_id)",
    "CREATE INDEX IF NOT EXISTS idx_shopping_list_items_list ON shopping_list_items (list_id)",
];
