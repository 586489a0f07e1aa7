//! Query-string parameter types shared by list endpoints.

use serde::Deserialize;

/// Query parameters for `GET /companies`.
///
/// Kept loosely typed (`limit`/`offset` as `i64`) so that range errors are
/// reported by domain validation with a useful message rather than by the
/// extractor.
#[derive(Debug, Default, Deserialize)]
pub struct ListCompaniesParams {
    /// Case-insensitive substring matched against name and ticker.
    pub q: Option<String>,
    /// Sort field, `-` prefix for descending.
    pub order: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
