//! # Pantrypal Access Crate
//!
//! This crate is the central authority for identity in the `pantrypal`
//! application. It owns the `User` record and the logic for resolving the
//! identifier carried by a session token into a persisted user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use turso::{params, Database, Error as TursoError, Row};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum AccessError {
    #[error("Database error: {0}")]
    Database(#[from] TursoError),
    #[error("Failed to create or find user for identifier: {0}")]
    UserPersistenceFailed(String),
    #[error("A user with identifier '{0}' already exists")]
    IdentifierTaken(String),
    #[error("User not found: {0}")]
    UserNotFound(String),
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),
}

/// Represents a user in the system.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    /// The unique, deterministic ID of the user (UUIDv5 from the external
    /// identifier the user first authenticated with).
    pub id: String,
    /// The external identifier supplied by the authentication provider,
    /// typically an email address.
    pub identifier: String,
    /// The user's display name.
    pub display_name: Option<String>,
    /// The user's dietary preferences (e.g. "vegetarian", "gluten-free").
    pub dietary_preferences: Vec<String>,
    /// The timestamp when the user was first created.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<&Row> for User {
    type Error = AccessError;

    fn try_from(row: &Row) -> std::result::Result<Self, Self::Error> {
        let display_name: Option<String> = match row.get_value(2)? {
            turso::Value::Text(s) => Some(s),
            _ => None,
        };
        let preferences_json: Option<String> = match row.get_value(3)? {
            turso::Value::Text(s) => Some(s),
            _ => None,
        };
        let dietary_preferences = match preferences_json {
            Some(json) => serde_json::from_str(&json).map_err(|e| {
                AccessError::DataIntegrity(format!("Failed to parse dietary preferences: {e}"))
            })?,
            None => Vec::new(),
        };

        let created_at_str: String = row.get(4)?;
        let created_at =
            chrono::NaiveDateTime::parse_from_str(&created_at_str, "%Y-%m-%d %H:%M:%S")
                .map(|ndt| DateTime::<Utc>::from_naive_utc_and_offset(ndt, Utc))
                .map_err(|e| {
                    AccessError::DataIntegrity(format!(
                        "Failed to parse date '{created_at_str}': {e}"
                    ))
                })?;

        Ok(User {
            id: row.get(0)?,
            identifier: row.get(1)?,
            display_name,
            dietary_preferences,
            created_at,
        })
    }
}

const USER_COLUMNS: &str = "id, identifier, display_name, dietary_preferences, created_at";

/// Finds a user by their external identifier (e.g. the email in a token's
/// `sub` claim), creating them if they don't exist.
///
/// New users get a deterministic UUIDv5 of the identifier as their primary
/// key, ensuring idempotency. Lookup is by the identifier column, so a user
/// who later changes their identifier keeps their original id.
pub async fn get_or_create_user(
    db: &Database,
    user_identifier: &str,
) -> Result<User, AccessError> {
    let conn = db.connect()?;

    let mut rows = conn
        .query(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE identifier = ?"),
            params![user_identifier],
        )
        .await?;

    if let Some(row) = rows.next().await? {
        return User::try_from(&row);
    }

    let user_id = Uuid::new_v5(&Uuid::NAMESPACE_URL, user_identifier.as_bytes()).to_string();
    conn.execute(
        "INSERT INTO users (id, identifier) VALUES (?, ?)",
        params![user_id.clone(), user_identifier],
    )
    .await?;

    // SELECT the newly created user to get all fields (like created_at).
    let mut rows = conn
        .query(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"),
            params![user_id],
        )
        .await?;

    let row = rows
        .next()
        .await?
        .ok_or_else(|| AccessError::UserPersistenceFailed(user_identifier.to_string()))?;

    User::try_from(&row)
}

/// Fetches a user by their primary key.
pub async fn get_user(db: &Database, user_id: &str) -> Result<Option<User>, AccessError> {
    let conn = db.connect()?;
    let mut rows = conn
        .query(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"),
            params![user_id],
        )
        .await?;

    match rows.next().await? {
        Some(row) => Ok(Some(User::try_from(&row)?)),
        None => Ok(None),
    }
}

/// Updates a user's display name and identifier.
///
/// Fails with `IdentifierTaken` if another user already holds the requested
/// identifier.
pub async fn update_profile(
    db: &Database,
    user_id: &str,
    display_name: &str,
    identifier: &str,
) -> Result<User, AccessError> {
    let conn = db.connect()?;

    let taken = conn
        .query(
            "SELECT 1 FROM users WHERE identifier = ? AND id != ? LIMIT 1",
            params![identifier, user_id],
        )
        .await?
        .next()
        .await?
        .is_some();
    if taken {
        return Err(AccessError::IdentifierTaken(identifier.to_string()));
    }

    conn.execute(
        "UPDATE users SET display_name = ?, identifier = ? WHERE id = ?",
        params![display_name, identifier, user_id],
    )
    .await?;

    get_user(db, user_id)
        .await?
        .ok_or_else(|| AccessError::UserNotFound(user_id.to_string()))
}

/// Replaces a user's stored dietary preference list.
pub async fn set_dietary_preferences(
    db: &Database,
    user_id: &str,
    preferences: &[String],
) -> Result<(), AccessError> {
    let conn = db.connect()?;
    let json = serde_json::to_string(preferences)
        .map_err(|e| AccessError::DataIntegrity(format!("Failed to encode preferences: {e}")))?;

    let changed = conn
        .execute(
            "UPDATE users SET dietary_preferences = ? WHERE id = ?",
            params![json, user_id],
        )
        .await?;
    if changed == 0 {
        return Err(AccessError::UserNotFound(user_id.to_string()));
    }
    Ok(())
}
