//! Completion backend seam
//!
//! The pipelines talk to the generation service through this trait so tests
//! (and alternative providers) can substitute their own implementation.

use async_trait::async_trait;
use common::GenerationError;

/// A supporting reference attached to a grounded completion
#[derive(Debug, Clone, PartialEq)]
pub struct Citation {
    pub title: String,
    /// Absent when the backend cites something without a usable link
    pub uri: Option<String>,
}

/// Raw output of one completion call
#[derive(Debug, Clone, Default)]
pub struct Completion {
    pub text: String,
    pub citations: Vec<Citation>,
}

/// A text-and-search generation service
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Run one prompt and return the raw response text plus citations.
    async fn complete(&self, prompt: &str, temperature: f32)
        -> Result<Completion, GenerationError>;
}
