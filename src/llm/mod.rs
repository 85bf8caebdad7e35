//! LLM backend used by the chatbot endpoint server.

pub mod ollama;
pub mod persona;

pub use ollama::{LlmError, OllamaClient};
pub use persona::Persona;

use async_trait::async_trait;

/// Produces reply text for a fully built prompt.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    /// Generate a completion for `prompt`.
    ///
    /// # Errors
    /// Returns an error if the backend cannot produce a non-empty completion.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Model identifier, for logs.
    fn model(&self) -> &str;
}
