use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ethix_core::error::CoreError;
use ethix_db::StoreError;
use ethix_llm::ModelError;
use ethix_pipeline::ScoringError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors, the upstream client errors, and
/// adds HTTP-specific variants. Implements [`IntoResponse`] to produce
/// consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `ethix_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A persistence error from `ethix_db`.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A failure anywhere in the rescoring pipeline.
    #[error(transparent)]
    Scoring(#[from] ScoringError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The server is missing required configuration. The message is shown.
    #[error("Server misconfigured: {0}")]
    Misconfigured(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
            },

            // --- Upstream errors ---
            AppError::Store(err) => classify_store_error(err),
            AppError::Scoring(err) => match err {
                ScoringError::Store(err) => classify_store_error(err),
                ScoringError::Model(err) => classify_model_error(err),
                ScoringError::Parse(err) => {
                    tracing::warn!(error = %err, "Model response could not be parsed");
                    (
                        StatusCode::BAD_GATEWAY,
                        "SCORE_PARSE_ERROR",
                        format!("Could not parse model response: {err}"),
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Misconfigured(msg) => {
                tracing::error!(error = %msg, "Server misconfigured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "MISCONFIGURED",
                    format!("Server misconfigured: {msg}"),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a store error into an HTTP status, error code, and message.
///
/// Unavailability details stay in the logs; rejections are echoed since they
/// describe the caller's payload.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::NotFound { id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("Company with id {id} not found"),
        ),
        StoreError::UpstreamUnavailable(detail) => {
            tracing::error!(error = %detail, "Store unavailable");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_UNAVAILABLE",
                "The company store is unavailable".to_string(),
            )
        }
        StoreError::ValidationRejected(detail) => {
            tracing::warn!(error = %detail, "Store rejected request");
            (
                StatusCode::BAD_REQUEST,
                "UPSTREAM_REJECTED",
                format!("The company store rejected the request: {detail}"),
            )
        }
    }
}

fn classify_model_error(err: &ModelError) -> (StatusCode, &'static str, String) {
    match err {
        ModelError::Unavailable(detail) => {
            tracing::error!(error = %detail, "Model unavailable");
            (
                StatusCode::BAD_GATEWAY,
                "MODEL_UNAVAILABLE",
                "The scoring model is unavailable".to_string(),
            )
        }
        ModelError::QuotaExceeded(detail) => {
            tracing::error!(error = %detail, "Model quota exceeded");
            (
                StatusCode::BAD_GATEWAY,
                "MODEL_QUOTA_EXCEEDED",
                "The scoring model quota is exhausted".to_string(),
            )
        }
    }
}
