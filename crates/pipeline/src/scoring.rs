use std::sync::Arc;

use chrono::Utc;
use ethix_core::company::{Company, CompanyChanges};
use ethix_core::prompt::build_prompt;
use ethix_core::scoring::parse_assessment;
use ethix_db::{CompanyStore, StoreError};
use ethix_llm::{CompletionClient, ModelError};

use crate::error::ScoringError;
use crate::retry::RetryPolicy;

/// Rescores a single company against the language model.
///
/// Steps run strictly in sequence: load the record, build the prompt, call
/// the model, parse the reply, write score and reason back together. Any
/// failure before the final write leaves the stored record unchanged.
#[derive(Clone)]
pub struct ScoringPipeline {
    store: Arc<dyn CompanyStore>,
    model: Arc<dyn CompletionClient>,
    retry: RetryPolicy,
}

impl ScoringPipeline {
    pub fn new(store: Arc<dyn CompanyStore>, model: Arc<dyn CompletionClient>) -> Self {
        Self {
            store,
            model,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn store(&self) -> &Arc<dyn CompanyStore> {
        &self.store
    }

    pub fn retry(&self) -> RetryPolicy {
        self.retry
    }

    pub async fn rescore(&self, id: &str) -> Result<Company, ScoringError> {
        let company = self
            .retry
            .run("load company", || self.store.get(id), StoreError::is_transient)
            .await?;

        let prompt = build_prompt(&company);

        let reply = self
            .retry
            .run(
                "model completion",
                || self.model.complete(&prompt),
                ModelError::is_transient,
            )
            .await?;

        let assessment = parse_assessment(&reply).inspect_err(|e| {
            tracing::warn!(company_id = %id, error = %e, reply = %reply, "Unparseable model response");
        })?;

        let changes = CompanyChanges::scored(assessment, Utc::now());
        let updated = self
            .retry
            .run(
                "store update",
                || self.store.update(id, &changes),
                StoreError::is_transient,
            )
            .await?;

        tracing::info!(
            company_id = %id,
            score = ?updated.ethics_score,
            "Company rescored",
        );

        Ok(updated)
    }
}
