//! # Pantry-driven Recipe Matching
//!
//! This crate provides a client for discovering recipes from a remote recipe
//! source based on a set of pantry ingredients. Results are normalized into a
//! canonical [`Recipe`] shape annotated with how well each recipe's
//! ingredient list is covered by the caller's selection.

pub mod errors;
pub mod types;

mod matcher;
mod samples;

pub use errors::RecipeError;
pub use types::{FallbackPolicy, Recipe, RecipeClient, RecipeClientBuilder};
