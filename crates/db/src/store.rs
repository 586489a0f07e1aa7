use async_trait::async_trait;
use ethix_core::company::{Company, CompanyChanges};
use ethix_core::query::CompanyQuery;

use crate::error::StoreError;

/// Read and update access to company records.
///
/// Implementations hold no per-request state and are shared behind an
/// `Arc<dyn CompanyStore>`.
#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// List companies matching `query`, ordered and paginated.
    async fn find(&self, query: &CompanyQuery) -> Result<Vec<Company>, StoreError>;

    /// Fetch a single company. Returns [`StoreError::NotFound`] when absent.
    async fn get(&self, id: &str) -> Result<Company, StoreError>;

    /// Write `changes` to a company and return the updated row.
    ///
    /// Returns [`StoreError::NotFound`] when absent.
    async fn update(&self, id: &str, changes: &CompanyChanges) -> Result<Company, StoreError>;
}
