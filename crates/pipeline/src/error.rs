use ethix_core::scoring::ScoreParseError;
use ethix_db::StoreError;
use ethix_llm::ModelError;

/// Why rescoring a single company failed.
///
/// Whatever the variant, the company record was left unchanged.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Could not parse model response: {0}")]
    Parse(#[from] ScoreParseError),
}
