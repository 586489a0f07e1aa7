pub mod companies;
pub mod health;
pub mod score;

use axum::Router;

use crate::state::AppState;

/// Build the API routes covered by the request timeout.
///
/// Route hierarchy:
///
/// ```text
/// /companies                 list (GET)
/// /companies/{id}            patch (PATCH, key)
/// ```
///
/// `/health` and the [`score`] routes are mounted separately by
/// [`build_app_router`](crate::router::build_app_router).
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(companies::router())
}
