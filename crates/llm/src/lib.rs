//! Completion client for the hosted language model.
//!
//! [`CompletionClient`] takes a [`Prompt`](ethix_core::prompt::Prompt) and
//! returns the model's raw text. Interpreting that text is the caller's job.

pub mod client;
pub mod error;
pub mod openai;

pub use client::CompletionClient;
pub use error::ModelError;
pub use openai::{OpenAiClient, OpenAiConfig};
