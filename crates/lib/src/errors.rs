use thiserror::Error;

/// Custom error types for the recipe matching core.
#[derive(Error, Debug)]
pub enum RecipeError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("Request to recipe source failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Recipe source returned an error (status {status}): {message}")]
    Api { status: u16, message: String },
    #[error("Failed to deserialize recipe source response: {0}")]
    Deserialization(#[from] serde_json::Error),
    #[error("Recipe source API key is missing")]
    MissingApiKey,
    #[error("No ingredient coverage record for recipe id {0}")]
    MissingCoverage(u64),
}
