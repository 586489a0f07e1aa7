#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use ethix_api::config::{LogFormat, ServerConfig, StoreBackend};
use ethix_api::router::build_app_router;
use ethix_api::state::AppState;
use ethix_core::prompt::Prompt;
use ethix_db::InMemoryCompanyStore;
use ethix_llm::{CompletionClient, ModelError, OpenAiConfig};
use ethix_pipeline::RetryPolicy;
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const TEST_API_KEY: &str = "test-api-key";

/// Build a test `ServerConfig` with safe defaults and no retries.
pub fn test_config(api_key: Option<&str>) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        api_key: api_key.map(str::to_string),
        store: StoreBackend::Memory,
        model: OpenAiConfig::new("sk-test"),
        retry: RetryPolicy::none(),
        batch_concurrency: 2,
        log_format: LogFormat::Text,
    }
}

type Respond = dyn Fn(&Prompt) -> Result<String, ModelError> + Send + Sync;

/// A [`CompletionClient`] answering through a closure, optionally after a delay.
pub struct FakeModel {
    respond: Box<Respond>,
    delay: Duration,
    calls: AtomicUsize,
}

impl FakeModel {
    pub fn from_fn(
        respond: impl Fn(&Prompt) -> Result<String, ModelError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            respond: Box::new(respond),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::from_fn(move |_| Ok(text.clone()))
    }

    pub fn unavailable() -> Self {
        Self::from_fn(|_| Err(ModelError::Unavailable("connection refused".into())))
    }

    pub fn over_quota() -> Self {
        Self::from_fn(|_| Err(ModelError::QuotaExceeded("insufficient_quota".into())))
    }

    /// Sleep for `delay` before every answer.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for FakeModel {
    async fn complete(&self, prompt: &Prompt) -> Result<String, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        (self.respond)(prompt)
    }
}

/// Build the full application router over the given store and model, using
/// the same middleware stack as production.
pub fn build_test_app_with(
    config: ServerConfig,
    store: Arc<InMemoryCompanyStore>,
    model: Arc<FakeModel>,
) -> Router {
    let state = AppState::new(config.clone(), store, model);
    build_app_router(state, &config)
}

/// Same as [`build_test_app_with`] with [`TEST_API_KEY`] configured.
pub fn build_test_app(store: Arc<InMemoryCompanyStore>, model: Arc<FakeModel>) -> Router {
    build_test_app_with(test_config(Some(TEST_API_KEY)), store, model)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> axum::response::Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> axum::response::Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post(app: Router, uri: &str, key: Option<&str>) -> axum::response::Response {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(key) = key {
        builder = builder.header("x-api-key", key);
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

pub async fn patch_json(
    app: Router,
    uri: &str,
    key: Option<&str>,
    body: serde_json::Value,
) -> axum::response::Response {
    let mut builder = Request::builder()
        .method("PATCH")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(key) = key {
        builder = builder.header("x-api-key", key);
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status and return the parsed body.
pub async fn expect_json(
    response: axum::response::Response,
    status: StatusCode,
) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
