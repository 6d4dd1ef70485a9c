//! # Persistence Store
//!
//! A thin wrapper over a local SQLite database (via Turso) holding users,
//! cached favorite recipes, and shopping lists. All access is
//! ownership-checked at the query level: a row the caller does not own is
//! indistinguishable from a row that does not exist.

pub mod favorites;
pub mod shopping_lists;

mod sql;

use thiserror::Error;
use turso::Database;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] turso::Error),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),
}

/// The application's persistence store.
///
/// Holds a `Database` instance, which manages a connection pool. When
/// cloned, it shares the same underlying database.
#[derive(Clone)]
pub struct Store {
    pub db: Database,
}

impl Store {
    /// Creates a new `Store` from a file path, or ":memory:" for an
    /// isolated in-memory database.
    pub async fn new(db_path: &str) -> Result<Self, StoreError> {
        let db = turso::Builder::new_local(db_path).build().await?;

        // WAL mode improves concurrency for file-backed databases and is a
        // no-op for in-memory ones.
        let conn = db.connect()?;
        conn.query("PRAGMA journal_mode=WAL;", ()).await?;

        Ok(Self { db })
    }

    /// Ensures that all required tables and indexes exist. Idempotent and
    /// safe to call on every application startup.
    pub async fn initialize_schema(&self) -> Result<(), StoreError> {
        let conn = self.db.connect()?;
        for statement in sql::ALL_TABLE_CREATION_SQL {
            conn.execute(statement, ()).await?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}
