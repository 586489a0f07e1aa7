//! Tests for `AppError` → HTTP response mapping.
//!
//! These tests verify that each `AppError` variant produces the correct HTTP
//! status code, error code, and message. They do NOT need an HTTP server --
//! they call `IntoResponse` directly on `AppError` values.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use ethix_api::error::AppError;
use ethix_core::error::CoreError;
use ethix_core::scoring::ScoreParseError;
use ethix_db::StoreError;
use ethix_llm::ModelError;
use ethix_pipeline::ScoringError;
use http_body_util::BodyExt;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Core errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("limit must be between 1 and 200".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "limit must be between 1 and 200");
}

#[tokio::test]
async fn unauthorized_error_returns_401() {
    let err = AppError::Core(CoreError::Unauthorized("Invalid API key".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn store_not_found_returns_404() {
    let (status, json) =
        error_to_response(StoreError::NotFound { id: "xyz".into() }.into()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Company with id xyz not found");
}

#[tokio::test]
async fn store_unavailable_returns_502_without_detail() {
    let err: AppError = StoreError::UpstreamUnavailable("connect to 10.0.0.3 refused".into()).into();

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["code"], "UPSTREAM_UNAVAILABLE");
    assert!(!json["error"].as_str().unwrap().contains("10.0.0.3"));
}

#[tokio::test]
async fn store_rejection_returns_400() {
    let err: AppError = StoreError::ValidationRejected("value too long".into()).into();

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "UPSTREAM_REJECTED");
}

// ---------------------------------------------------------------------------
// Scoring errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scoring_store_errors_map_like_store_errors() {
    let err: AppError = ScoringError::Store(StoreError::NotFound { id: "q".into() }).into();

    let (status, _) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn model_unavailable_returns_502() {
    let err: AppError = ScoringError::Model(ModelError::Unavailable("timeout".into())).into();

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["code"], "MODEL_UNAVAILABLE");
}

#[tokio::test]
async fn model_quota_returns_502() {
    let err: AppError = ScoringError::Model(ModelError::QuotaExceeded("429".into())).into();

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["code"], "MODEL_QUOTA_EXCEEDED");
}

#[tokio::test]
async fn parse_error_returns_502() {
    let err: AppError = ScoringError::Parse(ScoreParseError::MissingScore).into();

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["code"], "SCORE_PARSE_ERROR");
}

#[tokio::test]
async fn misconfiguration_returns_500_with_message() {
    let (status, json) =
        error_to_response(AppError::Misconfigured("API_KEY not set".into())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "MISCONFIGURED");
    assert_eq!(json["error"], "Server misconfigured: API_KEY not set");
}
