use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use ethix_core::company::{Company, CompanyChanges};
use ethix_core::patch::CompanyPatch;
use ethix_core::query::CompanyQuery;
use ethix_core::types::CompanyId;

use crate::error::{AppError, AppResult};
use crate::middleware::api_key::RequireApiKey;
use crate::query::ListCompaniesParams;
use crate::state::AppState;

/// GET /companies
///
/// Search, sort and page companies. Unscored companies sort last.
pub async fn list_companies(
    State(state): State<AppState>,
    params: Result<Query<ListCompaniesParams>, QueryRejection>,
) -> AppResult<Json<Vec<Company>>> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let query = CompanyQuery::from_params(
        params.q.as_deref(),
        params.order.as_deref(),
        params.limit,
        params.offset,
    )?;

    let companies = state.store.find(&query).await?;
    tracing::debug!(count = companies.len(), search = ?query.search, "Listed companies");
    Ok(Json(companies))
}

/// PATCH /companies/{id}
///
/// Manual edit. Score and reason travel together; `ticker: null` clears the
/// ticker. Bumps `last_updated`.
pub async fn update_company(
    _key: RequireApiKey,
    State(state): State<AppState>,
    Path(id): Path<CompanyId>,
    payload: Result<Json<CompanyPatch>, JsonRejection>,
) -> AppResult<Json<Company>> {
    let Json(patch) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    patch.validate()?;

    let changes = CompanyChanges::from_patch(patch, Utc::now());
    let updated = state.store.update(&id, &changes).await?;

    tracing::info!(company_id = %id, "Company updated");
    Ok(Json(updated))
}
