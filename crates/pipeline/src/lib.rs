//! Scoring pipeline and batch runner.
//!
//! [`ScoringPipeline`] rescores one company: load, prompt, complete, parse,
//! persist. [`BatchRunner`] drives the pipeline over every company with
//! bounded concurrency, isolating per-company failures.

pub mod batch;
pub mod error;
pub mod retry;
pub mod scoring;

pub use batch::{BatchRunner, BatchSummary};
pub use error::ScoringError;
pub use retry::RetryPolicy;
pub use scoring::ScoringPipeline;
