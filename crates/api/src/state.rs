use std::sync::Arc;

use ethix_db::CompanyStore;
use ethix_llm::CompletionClient;
use ethix_pipeline::{BatchRunner, ScoringPipeline};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (read by the API key guard).
    pub config: Arc<ServerConfig>,
    /// Company persistence.
    pub store: Arc<dyn CompanyStore>,
    /// Single-company rescoring.
    pub pipeline: ScoringPipeline,
    /// Whole-table rescoring.
    pub batch: Arc<BatchRunner>,
}

impl AppState {
    /// Wire the pipeline and batch runner over `store` and `model` using the
    /// retry and concurrency settings from `config`.
    pub fn new(
        config: ServerConfig,
        store: Arc<dyn CompanyStore>,
        model: Arc<dyn CompletionClient>,
    ) -> Self {
        let pipeline = ScoringPipeline::new(Arc::clone(&store), model).with_retry(config.retry);
        let batch = Arc::new(BatchRunner::new(pipeline.clone(), config.batch_concurrency));

        Self {
            config: Arc::new(config),
            store,
            pipeline,
            batch,
        }
    }
}
