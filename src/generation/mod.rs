//! AI card generation
//!
//! This module provides:
//! - Prompt shaping for topic, varied and weak-area requests
//! - The structured output contract and its validation
//! - An Anthropic Messages API client

pub mod client;
pub mod prompts;
pub mod schema;

use async_trait::async_trait;
use thiserror::Error;

pub use client::AnthropicGenerator;
pub use prompts::{GenerationMode, GenerationRequest};
pub use schema::{GeneratedBatch, GeneratedCard};

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication failed: check ANTHROPIC_API_KEY")]
    AuthFailed,

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    Schema(String),
}

/// Source of generated cards
///
/// Implementations only produce question/answer pairs; ids and
/// scheduling fields are assigned by the review session.
#[async_trait]
pub trait CardGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedBatch, GenerationError>;
}
