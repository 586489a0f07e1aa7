//! In-process [`CompanyStore`] with the same filter, order, and pagination
//! semantics as the hosted store. Used by tests and `STORE_BACKEND=memory`.

use async_trait::async_trait;
use ethix_core::company::{Company, CompanyChanges};
use ethix_core::query::CompanyQuery;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::store::CompanyStore;

#[derive(Debug, Default)]
pub struct InMemoryCompanyStore {
    rows: RwLock<Vec<Company>>,
}

impl InMemoryCompanyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing rows.
    pub fn with_companies(companies: Vec<Company>) -> Self {
        Self {
            rows: RwLock::new(companies),
        }
    }

    /// Import an unscored company with a freshly generated id.
    pub async fn insert(&self, name: &str, ticker: Option<&str>) -> Company {
        let company = Company {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            ticker: ticker.map(str::to_string),
            ethics_score: None,
            source_reason: None,
            last_updated: None,
        };
        self.rows.write().await.push(company.clone());
        company
    }

    /// Copy of every row, in insertion order.
    pub async fn snapshot(&self) -> Vec<Company> {
        self.rows.read().await.clone()
    }
}

#[async_trait]
impl CompanyStore for InMemoryCompanyStore {
    async fn find(&self, query: &CompanyQuery) -> Result<Vec<Company>, StoreError> {
        let rows = self.rows.read().await;
        let mut matched: Vec<Company> = rows.iter().filter(|c| query.matches(c)).cloned().collect();
        matched.sort_by(|a, b| query.order.compare(a, b));

        Ok(matched
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Company, StoreError> {
        self.rows
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }

    async fn update(&self, id: &str, changes: &CompanyChanges) -> Result<Company, StoreError> {
        let mut rows = self.rows.write().await;
        let company = rows
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        changes.apply_to(company);
        Ok(company.clone())
    }
}
