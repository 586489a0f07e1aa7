//! Domain types and pure logic for the Ethix backend.
//!
//! This crate has no network dependencies: the persistence and model
//! clients, the scoring pipeline, and the HTTP surface all build on the
//! types and functions defined here.

pub mod company;
pub mod error;
pub mod patch;
pub mod prompt;
pub mod query;
pub mod scoring;
pub mod types;
