//! Text generation trait for producing model completions from prompts.

use async_trait::async_trait;

use crate::error::Result;

/// A client that turns one assembled prompt into generated text.
///
/// This is the seam between the retrieval pipeline and the hosted model:
/// the query loop renders a prompt from retrieved context and hands it to
/// a `TextGenerator`. Implementations wrap specific backends (Titan on
/// Bedrock, test mocks) and surface failures as
/// [`RagError::Generation`](crate::RagError::Generation).
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for a single prompt, returning the first
    /// candidate's text.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
