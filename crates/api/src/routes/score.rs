//! Route definitions for rescoring.

use axum::routing::post;
use axum::Router;

use crate::handlers::score;
use crate::state::AppState;

/// Rescoring routes. `/score/cron` is static, so it wins over `/score/{id}`.
///
/// ```text
/// POST   /score/cron        -> score_all (requires x-api-key)
/// POST   /score/{id}        -> score_company (requires x-api-key)
/// ```
///
/// Both are bounded by the model and store client timeouts and the retry
/// policy rather than the request timeout.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/score/cron", post(score::score_all))
        .route("/score/{id}", post(score::score_company))
}
