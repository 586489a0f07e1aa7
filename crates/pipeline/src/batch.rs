//! Batch rescoring of every company.
//!
//! Ids are enumerated up front in stable `id` order so that rows updated
//! mid-run never shift pagination. Each company is then rescored
//! independently; one failure never aborts the batch.

use ethix_core::query::CompanyQuery;
use ethix_core::types::CompanyId;
use ethix_db::StoreError;
use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::scoring::ScoringPipeline;

/// Rows fetched per page while enumerating companies.
pub const BATCH_PAGE_SIZE: u32 = 200;

/// Default number of companies rescored concurrently.
pub const DEFAULT_BATCH_CONCURRENCY: usize = 4;

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Companies rescored and written back.
    pub succeeded: usize,
    /// Ids left with their previous score, sorted.
    pub failed: Vec<CompanyId>,
}

pub struct BatchRunner {
    pipeline: ScoringPipeline,
    concurrency: usize,
}

impl BatchRunner {
    /// `concurrency` is clamped to at least 1.
    pub fn new(pipeline: ScoringPipeline, concurrency: usize) -> Self {
        Self {
            pipeline,
            concurrency: concurrency.max(1),
        }
    }

    /// Rescore every company.
    ///
    /// Only a failure to enumerate companies fails the whole run.
    pub async fn run(&self) -> Result<BatchSummary, StoreError> {
        let ids = self.company_ids().await?;
        let total = ids.len();
        tracing::info!(total, concurrency = self.concurrency, "Starting batch rescoring");

        let pipeline = self.pipeline.clone();
        let outcomes: Vec<(CompanyId, bool)> = stream::iter(ids)
            .map(move |id| {
                let pipeline = pipeline.clone();
                async move {
                    match pipeline.rescore(&id).await {
                        Ok(_) => (id, true),
                        Err(e) => {
                            tracing::warn!(company_id = %id, error = %e, "Rescoring failed");
                            (id, false)
                        }
                    }
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut summary = BatchSummary::default();
        for (id, ok) in outcomes {
            if ok {
                summary.succeeded += 1;
            } else {
                summary.failed.push(id);
            }
        }
        summary.failed.sort();

        tracing::info!(
            total,
            succeeded = summary.succeeded,
            failed = summary.failed.len(),
            "Batch rescoring finished",
        );

        Ok(summary)
    }

    async fn company_ids(&self) -> Result<Vec<CompanyId>, StoreError> {
        let store = self.pipeline.store();
        let retry = self.pipeline.retry();
        let mut ids = Vec::new();
        let mut offset = 0;

        loop {
            let query = CompanyQuery::page_by_id(offset, BATCH_PAGE_SIZE);
            let page = retry
                .run("list companies", || store.find(&query), StoreError::is_transient)
                .await?;
            let fetched = page.len();
            ids.extend(page.into_iter().map(|c| c.id));

            if fetched < BATCH_PAGE_SIZE as usize {
                break;
            }
            offset += BATCH_PAGE_SIZE;
        }

        Ok(ids)
    }
}
