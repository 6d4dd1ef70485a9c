use crate::storage::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pantrypal::RecipeError;
use pantrypal_access::AccessError;
use serde_json::json;
use tracing::error;

/// A custom error type for the server application.
///
/// This enum encapsulates the different kinds of errors that can occur
/// within the server, allowing them to be converted into appropriate HTTP
/// responses.
pub enum AppError {
    /// Errors from the recipe matching core.
    Recipe(RecipeError),
    /// Errors from the identity layer.
    Access(AccessError),
    /// Errors from the persistence store.
    Store(StoreError),
    /// The request payload was rejected.
    BadRequest(String),
    /// The requested resource does not exist (or is not the caller's).
    NotFound(String),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<RecipeError> for AppError {
    fn from(err: RecipeError) -> Self {
        AppError::Recipe(err)
    }
}

impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        AppError::Access(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::Recipe(err) => {
                error!("RecipeError: {:?}", err);
                match err {
                    RecipeError::MissingApiKey | RecipeError::ClientBuild(_) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Server is not configured correctly.".to_string(),
                    ),
                    RecipeError::Request(e) => (
                        StatusCode::BAD_GATEWAY,
                        format!("Request to recipe source failed: {e}"),
                    ),
                    RecipeError::Api { status, message } => (
                        StatusCode::BAD_GATEWAY,
                        format!("Recipe source error (status {status}): {message}"),
                    ),
                    RecipeError::Deserialization(e) => (
                        StatusCode::BAD_GATEWAY,
                        format!("Failed to deserialize recipe source response: {e}"),
                    ),
                    RecipeError::MissingCoverage(id) => (
                        StatusCode::BAD_GATEWAY,
                        format!("Recipe source returned an unmatched detail record: {id}"),
                    ),
                }
            }
            AppError::Access(err) => {
                error!("AccessError: {:?}", err);
                match err {
                    AccessError::IdentifierTaken(identifier) => (
                        StatusCode::CONFLICT,
                        format!("A user with identifier '{identifier}' already exists."),
                    ),
                    AccessError::UserNotFound(_) => {
                        (StatusCode::NOT_FOUND, "User not found.".to_string())
                    }
                    _ => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An internal server error occurred.".to_string(),
                    ),
                }
            }
            AppError::Store(err) => {
                error!("StoreError: {:?}", err);
                match err {
                    StoreError::NotFound(what) => {
                        (StatusCode::NOT_FOUND, format!("{what} not found."))
                    }
                    _ => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An internal server error occurred.".to_string(),
                    ),
                }
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
