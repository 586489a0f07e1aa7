//! Route definitions for company listing and editing.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::companies;
use crate::state::AppState;

/// Routes mounted at the root.
///
/// ```text
/// GET    /companies         -> list_companies
/// PATCH  /companies/{id}    -> update_company (requires x-api-key)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/companies", get(companies::list_companies))
        .route("/companies/{id}", patch(companies::update_company))
}
