use async_trait::async_trait;
use ethix_core::prompt::Prompt;

use crate::error::ModelError;

/// A single-shot text completion: one prompt in, one reply out.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &Prompt) -> Result<String, ModelError>;
}
