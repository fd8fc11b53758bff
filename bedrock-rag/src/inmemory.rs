//! In-memory vector store using cosine similarity.
//!
//! This module provides [`InMemoryVectorStore`], a self-contained vector
//! store backed by a `Vec` protected by a `tokio::sync::RwLock`. It is
//! suitable for development, testing, and small single-document corpora.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{Chunk, ScoredChunk};
use crate::error::{RagError, Result};
use crate::vectorstore::{VectorStore, cosine_similarity};

/// An in-memory vector store using cosine similarity for search.
///
/// Entries live in a `Vec` in insertion order, which is what makes
/// tie-breaking deterministic: the sort is stable, so equal scores keep
/// their insertion order. The embedding dimension is fixed at
/// construction and enforced on every add and query.
///
/// # Example
///
/// ```rust,ignore
/// use bedrock_rag::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new(1536);
/// store.add(&chunks).await?;
/// ```
#[derive(Debug)]
pub struct InMemoryVectorStore {
    dimensions: usize,
    entries: RwLock<Vec<Chunk>>,
}

impl InMemoryVectorStore {
    /// Create a new empty store for embeddings of the given dimension.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions, entries: RwLock::new(Vec::new()) }
    }

    /// Number of entries currently stored.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn add(&self, chunks: &[Chunk]) -> Result<usize> {
        for chunk in chunks {
            if chunk.embedding.len() != self.dimensions {
                return Err(RagError::DimensionMismatch {
                    expected: self.dimensions,
                    actual: chunk.embedding.len(),
                });
            }
        }
        let mut entries = self.entries.write().await;
        entries.extend_from_slice(chunks);
        Ok(chunks.len())
    }

    async fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>> {
        if embedding.len() != self.dimensions {
            return Err(RagError::DimensionMismatch {
                expected: self.dimensions,
                actual: embedding.len(),
            });
        }

        let entries = self.entries.read().await;
        let mut scored: Vec<ScoredChunk> = entries
            .iter()
            .map(|chunk| {
                let score = cosine_similarity(&chunk.embedding, embedding);
                ScoredChunk { chunk: chunk.clone(), score }
            })
            .collect();

        // sort_by is stable: equal scores stay in insertion order.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
