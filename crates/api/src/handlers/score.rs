use axum::extract::{Path, State};
use axum::Json;
use ethix_core::company::Company;
use ethix_core::types::CompanyId;
use ethix_pipeline::BatchSummary;

use crate::error::AppResult;
use crate::middleware::api_key::RequireApiKey;
use crate::state::AppState;

/// POST /score/{id}
///
/// Rescore one company and return the updated record. On any failure the
/// stored record is left as it was.
pub async fn score_company(
    _key: RequireApiKey,
    State(state): State<AppState>,
    Path(id): Path<CompanyId>,
) -> AppResult<Json<Company>> {
    let updated = state.pipeline.rescore(&id).await?;
    Ok(Json(updated))
}

/// POST /score/cron
///
/// Rescore every company. Per-company failures are reported in the summary,
/// not as an error status.
pub async fn score_all(
    _key: RequireApiKey,
    State(state): State<AppState>,
) -> AppResult<Json<BatchSummary>> {
    let summary = state.batch.run().await?;
    Ok(Json(summary))
}
