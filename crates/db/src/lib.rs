//! Persistence client for the hosted `companies` table.
//!
//! [`CompanyStore`] is the seam the scoring pipeline and HTTP handlers
//! depend on. [`RestCompanyStore`] talks to a PostgREST endpoint;
//! [`InMemoryCompanyStore`] backs tests and local development.

pub mod error;
pub mod memory;
pub mod rest;
pub mod store;

pub use error::StoreError;
pub use memory::InMemoryCompanyStore;
pub use rest::{RestCompanyStore, RestStoreConfig};
pub use store::CompanyStore;
