//! # Authentication Middleware
//!
//! This module provides the Axum extractor for session-token
//! authentication. The tokens themselves come from an external
//! authentication provider; this server only validates them and resolves
//! the carried identity into a persisted user.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use pantrypal_access::{get_or_create_user, User};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};

use crate::state::AppState;

/// The claims expected in a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The subject of the token, used as the unique user identifier
    /// (typically an email address).
    pub sub: String,
    /// The expiration timestamp.
    pub exp: usize,
}

/// An Axum extractor that provides the currently authenticated user.
///
/// A missing, invalid, or expired token rejects the request with a `401
/// Unauthorized`; every protected handler therefore always receives a valid
/// `User`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// A custom rejection type for authentication failures.
pub struct AuthError(StatusCode, String);

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "error": self.1 }))).into_response()
    }
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    AuthError(
                        StatusCode::UNAUTHORIZED,
                        "Authentication required.".to_string(),
                    )
                })?;

        let token_data = decode::<Claims>(
            bearer.token(),
            &DecodingKey::from_secret(state.config.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|e| {
            warn!("Session token validation failed: {}", e);
            AuthError(
                StatusCode::UNAUTHORIZED,
                "Invalid or expired token.".to_string(),
            )
        })?;

        let user = get_or_create_user(&state.store.db, &token_data.claims.sub)
            .await
            .map_err(|e| {
                // This is an internal error because the DB should be available.
                error!("Failed to get or create user: {}", e);
                AuthError(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Could not retrieve user: {e}"),
                )
            })?;

        Ok(AuthenticatedUser(user))
    }
}
