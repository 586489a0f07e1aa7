/// Errors from the model client.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Network failure, non-success status, or an unusable response body.
    #[error("Model unavailable: {0}")]
    Unavailable(String),

    /// The provider refused the call because of rate or billing limits (HTTP 429).
    #[error("Model quota exceeded: {0}")]
    QuotaExceeded(String),
}

impl ModelError {
    /// Whether retrying the same request may succeed.
    ///
    /// Quota errors are not transient on the timescale of a single request.
    pub fn is_transient(&self) -> bool {
        matches!(self, ModelError::Unavailable(_))
    }
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        ModelError::Unavailable(err.to_string())
    }
}
