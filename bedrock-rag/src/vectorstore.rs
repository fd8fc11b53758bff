//! Vector store trait for storing and searching vector embeddings.

use async_trait::async_trait;

use crate::document::{Chunk, ScoredChunk};
use crate::error::Result;

/// A storage backend for embedded chunks with similarity search.
///
/// A store holds one append-only collection of [`Chunk`]s whose embedding
/// dimension is fixed when the store is constructed. There is no update
/// or delete path; the load phase adds entries once and the query phase
/// only reads.
///
/// # Example
///
/// ```rust,ignore
/// use bedrock_rag::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new(1536);
/// store.add(&chunks).await?;
/// let results = store.query(&query_embedding, 5).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Append chunks to the store, returning how many were added.
    ///
    /// Every chunk's embedding is dimension-checked before anything is
    /// written, so a [`DimensionMismatch`](crate::RagError::DimensionMismatch)
    /// leaves the store contents unchanged.
    async fn add(&self, chunks: &[Chunk]) -> Result<usize>;

    /// Return the `top_k` entries most similar to `embedding`, ordered by
    /// descending cosine similarity.
    ///
    /// Ties are broken by insertion order, earliest first. Returns fewer
    /// than `top_k` results when the store holds fewer entries, and an
    /// empty `Vec` (not an error) when it is empty.
    async fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>>;

    /// The embedding dimension this store was built with.
    fn dimensions(&self) -> usize;
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
