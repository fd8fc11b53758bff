//! Titan model adapters using the `bedrock-runtime` crate.
//!
//! This module is only available when the `bedrock` feature is enabled.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use bedrock_runtime::{BedrockRuntime, TitanEmbedder, TitanText};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::generation::TextGenerator;

/// An [`EmbeddingProvider`] backed by Titan Embeddings G1 - Text.
///
/// Wraps a [`bedrock_runtime::TitanEmbedder`] and surfaces its failures
/// as [`RagError::Embedding`]. Titan embeds one text per request, so
/// batches go through the trait's sequential default.
///
/// # Example
///
/// ```rust,ignore
/// use bedrock_rag::titan::TitanEmbeddingProvider;
/// use bedrock_runtime::BedrockRuntime;
///
/// let client = Arc::new(BedrockRuntime::from_env()?);
/// let provider = TitanEmbeddingProvider::new(client);
/// let embedding = provider.embed("hello world").await?;
/// ```
pub struct TitanEmbeddingProvider {
    embedder: TitanEmbedder,
}

impl TitanEmbeddingProvider {
    /// Create a provider using the default `amazon.titan-embed-text-v1`
    /// model.
    pub fn new(client: Arc<BedrockRuntime>) -> Self {
        Self { embedder: TitanEmbedder::new(client) }
    }

    /// Create a provider from a preconfigured embedder (custom model id
    /// or dimensions).
    pub fn from_embedder(embedder: TitanEmbedder) -> Self {
        Self { embedder }
    }
}

#[async_trait]
impl EmbeddingProvider for TitanEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = "Titan", text_len = text.len(), "embedding single text");

        self.embedder.embed(text).await.map_err(|e| {
            error!(provider = "Titan", error = %e, "embedding request failed");
            RagError::Embedding { provider: "Titan".into(), message: format!("{e}") }
        })
    }

    fn dimensions(&self) -> usize {
        self.embedder.dimensions()
    }
}

/// A [`TextGenerator`] backed by Titan Text Premier.
pub struct TitanTextGenerator {
    model: TitanText,
}

impl TitanTextGenerator {
    /// Create a generator using the default `amazon.titan-text-premier-v1:0`
    /// model.
    pub fn new(client: Arc<BedrockRuntime>) -> Self {
        Self { model: TitanText::new(client) }
    }

    /// Create a generator from a preconfigured model handle.
    pub fn from_model(model: TitanText) -> Self {
        Self { model }
    }

    /// Cap the number of tokens the model may generate.
    pub fn with_max_token_count(mut self, max_token_count: u32) -> Self {
        self.model = self.model.with_max_token_count(max_token_count);
        self
    }
}

#[async_trait]
impl TextGenerator for TitanTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(provider = "Titan", prompt_bytes = prompt.len(), "generating completion");

        self.model.generate(prompt).await.map_err(|e| {
            error!(provider = "Titan", error = %e, "generation request failed");
            RagError::Generation { provider: "Titan".into(), message: format!("{e}") }
        })
    }
}
