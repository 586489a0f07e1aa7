use ethix_core::types::CompanyId;

/// Errors surfaced by a [`CompanyStore`](crate::CompanyStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No company with the requested id exists.
    #[error("Company with id {id} not found")]
    NotFound { id: CompanyId },

    /// The store could not be reached or answered with a server-side failure.
    #[error("Upstream store unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The store refused the request payload or filter.
    #[error("Upstream store rejected the request: {0}")]
    ValidationRejected(String),
}

impl StoreError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::UpstreamUnavailable(_))
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::UpstreamUnavailable(err.to_string())
    }
}
