//! PostgREST client for the `companies` table.
//!
//! Wraps the hosted store's REST dialect (`?id=eq.<id>`, `order=<col>.desc`,
//! `or=(...)`) using [`reqwest`]. No caching and no retries: every error is
//! classified and returned to the caller.

use std::time::Duration;

use async_trait::async_trait;
use ethix_core::company::{Company, CompanyChanges, COLUMNS};
use ethix_core::query::CompanyQuery;
use reqwest::StatusCode;

use crate::error::StoreError;
use crate::store::CompanyStore;

/// Default table name.
pub const DEFAULT_TABLE: &str = "companies";

/// Default per-request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Connection settings for the hosted store.
#[derive(Debug, Clone)]
pub struct RestStoreConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`.
    pub base_url: String,
    /// Service key sent as both `apikey` and bearer token.
    pub api_key: String,
    /// Table exposed under `/rest/v1/`.
    pub table: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl RestStoreConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            table: DEFAULT_TABLE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// HTTP client for the hosted `companies` table.
pub struct RestCompanyStore {
    client: reqwest::Client,
    table_url: String,
    api_key: String,
}

impl RestCompanyStore {
    /// Create a store client with its own connection pool.
    pub fn new(config: &RestStoreConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create a store client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: &RestStoreConfig) -> Self {
        Self {
            client,
            table_url: format!(
                "{}/rest/v1/{}",
                config.base_url.trim_end_matches('/'),
                config.table
            ),
            api_key: config.api_key.clone(),
        }
    }

    fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        self.client
            .request(method, &self.table_url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, classifying failures.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(classify_status(status, body))
    }

    /// Parse a successful JSON array of rows.
    async fn parse_rows(response: reqwest::Response) -> Result<Vec<Company>, StoreError> {
        let response = Self::ensure_success(response).await?;
        response
            .json::<Vec<Company>>()
            .await
            .map_err(|e| StoreError::UpstreamUnavailable(format!("Malformed store response: {e}")))
    }
}

#[async_trait]
impl CompanyStore for RestCompanyStore {
    async fn find(&self, query: &CompanyQuery) -> Result<Vec<Company>, StoreError> {
        let params = list_params(query);
        tracing::debug!(?params, "Listing companies");

        let response = self
            .request(reqwest::Method::GET)
            .query(&params)
            .send()
            .await?;

        Self::parse_rows(response).await
    }

    async fn get(&self, id: &str) -> Result<Company, StoreError> {
        let response = self
            .request(reqwest::Method::GET)
            .query(&[
                ("select", COLUMNS.to_string()),
                ("id", format!("eq.{id}")),
                ("limit", "1".to_string()),
            ])
            .send()
            .await?;

        Self::parse_rows(response)
            .await
            .map_err(|e| malformed_id_as_not_found(e, id))?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }

    async fn update(&self, id: &str, changes: &CompanyChanges) -> Result<Company, StoreError> {
        tracing::debug!(company_id = %id, "Updating company");

        let response = self
            .request(reqwest::Method::PATCH)
            .query(&[("select", COLUMNS.to_string()), ("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(changes)
            .send()
            .await?;

        Self::parse_rows(response)
            .await
            .map_err(|e| malformed_id_as_not_found(e, id))?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }
}

/// Build the PostgREST query string for a listing.
pub fn list_params(query: &CompanyQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![("select", COLUMNS.to_string())];

    if let Some(term) = &query.search {
        let pattern = quote_filter_value(&format!("*{}*", escape_like(term)));
        params.push((
            "or",
            format!("(name.ilike.{pattern},ticker.ilike.{pattern})"),
        ));
    }

    let direction = if query.order.descending { "desc" } else { "asc" };
    params.push((
        "order",
        format!("{}.{direction}.nullslast", query.order.field.as_str()),
    ));
    params.push(("limit", query.limit.to_string()));
    params.push(("offset", query.offset.to_string()));
    params
}

/// Make `%`, `_` and `\` literal inside an `ilike` pattern.
///
/// PostgREST turns every `*` into `%`, so a literal `*` cannot be expressed;
/// it becomes the single-character wildcard `_` instead.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        match c {
            '\\' | '%' | '_' => {
                out.push('\\');
                out.push(c);
            }
            '*' => out.push('_'),
            _ => out.push(c),
        }
    }
    out
}

/// Postgres `invalid_text_representation`, returned when an id is not a UUID.
const INVALID_TEXT_REPRESENTATION: &str = "22P02";

/// An id the `uuid` column cannot even parse names no row.
fn malformed_id_as_not_found(err: StoreError, id: &str) -> StoreError {
    match err {
        StoreError::ValidationRejected(body)
            if postgres_code(&body) == Some(INVALID_TEXT_REPRESENTATION) =>
        {
            tracing::debug!(company_id = %id, "Store rejected malformed id");
            StoreError::NotFound { id: id.to_string() }
        }
        other => other,
    }
}

/// The `code` field of a PostgREST error body, if present.
fn postgres_code(body: &str) -> Option<&str> {
    #[derive(serde::Deserialize)]
    struct ErrorBody<'a> {
        #[serde(borrow)]
        code: Option<&'a str>,
    }
    serde_json::from_str::<ErrorBody>(body).ok()?.code
}

/// Double-quote a filter value so reserved characters (`,.()`) are literal.
fn quote_filter_value(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Map a non-success status to a store error.
///
/// Auth failures, missing tables, throttling, and server errors mean the
/// store is unusable right now; other client errors mean it rejected the
/// request itself.
fn classify_status(status: StatusCode, body: String) -> StoreError {
    match status {
        StatusCode::UNAUTHORIZED
        | StatusCode::FORBIDDEN
        | StatusCode::NOT_FOUND
        | StatusCode::TOO_MANY_REQUESTS => {
            tracing::error!(%status, %body, "Store request failed");
            StoreError::UpstreamUnavailable(format!("store responded {status}"))
        }
        s if s.is_client_error() => {
            tracing::warn!(%status, %body, "Store rejected request");
            StoreError::ValidationRejected(body)
        }
        _ => {
            tracing::error!(%status, %body, "Store request failed");
            StoreError::UpstreamUnavailable(format!("store responded {status}"))
        }
    }
}
