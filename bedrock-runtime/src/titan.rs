//! Payloads and convenience wrappers for the Amazon Titan model family.
//!
//! Wire formats follow the Bedrock `InvokeModel` contracts for Titan Text
//! and Titan Embeddings G1.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::BedrockRuntime;
use crate::error::{BedrockError, Result};

/// Model id for Titan Text G1 - Premier.
pub const TITAN_TEXT_PREMIER: &str = "amazon.titan-text-premier-v1:0";
/// Hard output-token ceiling for Titan Text Premier.
pub const TITAN_TEXT_PREMIER_MAX_TOKENS: u32 = 3072;
/// Model id for Titan Embeddings G1 - Text.
pub const TITAN_EMBED_G1_TEXT: &str = "amazon.titan-embed-text-v1";
/// Output dimension of Titan Embeddings G1 - Text vectors.
pub const TITAN_EMBED_G1_DIMENSIONS: usize = 1536;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextGenerationRequest {
    pub input_text: String,
    pub text_generation_config: TextGenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextGenerationConfig {
    pub max_token_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stop_sequences: Vec<String>,
}

impl Default for TextGenerationConfig {
    fn default() -> Self {
        Self {
            max_token_count: TITAN_TEXT_PREMIER_MAX_TOKENS,
            temperature: None,
            top_p: None,
            stop_sequences: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextGenerationResponse {
    pub input_text_token_count: u32,
    pub results: Vec<TextGenerationResult>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextGenerationResult {
    pub token_count: u32,
    pub output_text: String,
    pub completion_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingRequest {
    pub input_text: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingResponse {
    pub embedding: Vec<f32>,
    pub input_text_token_count: u32,
}

/// Titan text-generation model bound to a shared runtime client.
#[derive(Debug, Clone)]
pub struct TitanText {
    client: Arc<BedrockRuntime>,
    model_id: String,
    config: TextGenerationConfig,
}

impl TitanText {
    /// Titan Text Premier with the default generation config.
    pub fn new(client: Arc<BedrockRuntime>) -> Self {
        Self {
            client,
            model_id: TITAN_TEXT_PREMIER.to_string(),
            config: TextGenerationConfig::default(),
        }
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn with_max_token_count(mut self, max_token_count: u32) -> Self {
        self.config.max_token_count = max_token_count;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = Some(temperature);
        self
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Sends one prompt and returns the first candidate's text.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let request = TextGenerationRequest {
            input_text: prompt.to_string(),
            text_generation_config: self.config.clone(),
        };
        let response: TextGenerationResponse =
            self.client.invoke_model(&self.model_id, &request).await?;
        let first = response.results.into_iter().next().ok_or_else(|| {
            BedrockError::EmptyResponse { model_id: self.model_id.clone() }
        })?;
        debug!(
            model_id = %self.model_id,
            tokens = first.token_count,
            completion_reason = ?first.completion_reason,
            "text generation complete"
        );
        Ok(first.output_text)
    }
}

/// Titan embedding model bound to a shared runtime client.
#[derive(Debug, Clone)]
pub struct TitanEmbedder {
    client: Arc<BedrockRuntime>,
    model_id: String,
    dimensions: usize,
}

impl TitanEmbedder {
    /// Titan Embeddings G1 - Text, 1536 dimensions.
    pub fn new(client: Arc<BedrockRuntime>) -> Self {
        Self {
            client,
            model_id: TITAN_EMBED_G1_TEXT.to_string(),
            dimensions: TITAN_EMBED_G1_DIMENSIONS,
        }
    }

    pub fn with_model(mut self, model_id: impl Into<String>, dimensions: usize) -> Self {
        self.model_id = model_id.into();
        self.dimensions = dimensions;
        self
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Embeds one text and returns its vector.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest { input_text: text.to_string() };
        let response: EmbeddingResponse =
            self.client.invoke_model(&self.model_id, &request).await?;
        debug!(
            model_id = %self.model_id,
            tokens = response.input_text_token_count,
            dimensions = response.embedding.len(),
            "embedding complete"
        );
        Ok(response.embedding)
    }
}
