//! Pipeline orchestration: ingest documents, retrieve context.
//!
//! [`RagPipeline`] wires a chunker, an [`EmbeddingProvider`] and a
//! [`VectorStore`] together. The load phase calls [`RagPipeline::ingest`]
//! once per document; the query phase calls [`RagPipeline::retrieve`] once
//! per question. Component errors pass through unchanged, so callers see
//! the originating [`crate::RagError`] variant.

use std::fmt;
use std::sync::Arc;

use tracing::{error, info};

use crate::chunking::{Chunker, RecursiveChunker};
use crate::config::RagConfig;
use crate::document::{Chunk, Document, ScoredChunk};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// Orchestrates chunking, embedding and vector storage.
pub struct RagPipeline {
    config: RagConfig,
    chunker: Arc<dyn Chunker>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
}

impl fmt::Debug for RagPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RagPipeline").field("config", &self.config).finish_non_exhaustive()
    }
}

impl RagPipeline {
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedding_provider
    }

    pub fn vector_store(&self) -> &Arc<dyn VectorStore> {
        &self.vector_store
    }

    /// Chunk a document, embed every chunk and add them to the store.
    ///
    /// Returns the stored chunks with their embeddings attached. A
    /// document with no text yields no chunks and touches nothing.
    pub async fn ingest(&self, document: &Document) -> Result<Vec<Chunk>> {
        // 1. Chunk the document
        let mut chunks = self.chunker.chunk(document);
        if chunks.is_empty() {
            info!(document_id = %document.id, "document produced no chunks");
            return Ok(chunks);
        }

        // 2. Embed all chunk texts in one batch
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings =
            self.embedding_provider.embed_batch(&texts).await.inspect_err(|e| {
                error!(document_id = %document.id, error = %e, "embedding failed during ingest");
            })?;

        // 3. Attach each embedding to its chunk
        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        // 4. Store the embedded chunks
        let added = self.vector_store.add(&chunks).await.inspect_err(|e| {
            error!(document_id = %document.id, error = %e, "vector store rejected chunks");
        })?;

        info!(document_id = %document.id, chunk_count = added, "document ingested");
        Ok(chunks)
    }

    /// Retrieve the configured number of most similar chunks for a query.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<ScoredChunk>> {
        self.retrieve_top_k(query, self.config.top_k).await
    }

    /// Retrieve at most `top_k` chunks ranked by similarity to `query`.
    pub async fn retrieve_top_k(&self, query: &str, top_k: usize) -> Result<Vec<ScoredChunk>> {
        let embedding = self.embedding_provider.embed(query).await.inspect_err(|e| {
            error!(error = %e, "query embedding failed");
        })?;

        let results = self.vector_store.query(&embedding, top_k).await.inspect_err(|e| {
            error!(error = %e, "vector store query failed");
        })?;

        info!(result_count = results.len(), top_k, "retrieved context");
        Ok(results)
    }
}

/// Builder for [`RagPipeline`].
///
/// An embedding provider and a vector store are required; the config
/// defaults to [`RagConfig::default`] and the chunker to a
/// [`RecursiveChunker`] sized from the config.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    chunker: Option<Arc<dyn Chunker>>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
}

impl RagPipelineBuilder {
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// # Errors
    ///
    /// Returns [`RagError::Config`] when a required component is missing.
    pub fn build(self) -> Result<RagPipeline> {
        let config = self.config.unwrap_or_default();
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::Config("embedding provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::Config("vector store is required".to_string()))?;
        let chunker = self
            .chunker
            .unwrap_or_else(|| Arc::new(RecursiveChunker::new(config.chunk_size, config.chunk_overlap)));

        Ok(RagPipeline { config, chunker, embedding_provider, vector_store })
    }
}
