//! Shared-secret extractor for mutating endpoints.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use ethix_core::error::CoreError;
use sha2::{Digest, Sha256};

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Guard for routes that mutate company records.
///
/// Runs before the body extractor, so a rejected request never reaches the
/// store or the model:
///
/// ```ignore
/// async fn my_handler(_key: RequireApiKey, State(state): State<AppState>) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireApiKey;

impl FromRequestParts<AppState> for RequireApiKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config.api_key.as_deref() else {
            return Err(AppError::Misconfigured("API_KEY not set".into()));
        };

        let provided = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Missing x-api-key header".into()))
            })?;

        if !keys_match(provided, expected) {
            tracing::warn!(path = %parts.uri.path(), "Rejected request with invalid API key");
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid API key".into(),
            )));
        }

        Ok(RequireApiKey)
    }
}

/// Compare two keys without early exit. Hashing first fixes the length so
/// the comparison time reveals nothing about the expected key.
fn keys_match(provided: &str, expected: &str) -> bool {
    let provided = Sha256::digest(provided.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    provided
        .iter()
        .zip(expected.iter())
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}
