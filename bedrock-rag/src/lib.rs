//! # bedrock-rag
//!
//! Retrieval-augmented generation over Amazon Bedrock Titan models.
//!
//! ## Overview
//!
//! The crate covers both phases of a RAG application:
//!
//! - **Load**: [`RecursiveChunker`] splits documents into overlapping
//!   chunks, an [`EmbeddingProvider`] turns them into vectors and a
//!   [`VectorStore`] keeps them ([`InMemoryVectorStore`], or Postgres
//!   via the `pgvector` feature).
//! - **Query**: [`RagPipeline`] embeds a question and retrieves the most
//!   similar chunks; [`RetrievalQa`] renders them into a
//!   [`PromptTemplate`] and asks a [`TextGenerator`] for the answer.
//!
//! Production implementations of the model traits live behind the
//! `bedrock` feature ([`titan::TitanEmbeddingProvider`],
//! [`titan::TitanTextGenerator`]); the `loader` feature adds
//! [`loader::HtmlLoader`] for fetching web pages.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use bedrock_rag::prompt::PromptTemplate;
//! use bedrock_rag::titan::{TitanEmbeddingProvider, TitanTextGenerator};
//! use bedrock_rag::{InMemoryVectorStore, RagPipeline, RetrievalQa};
//! use bedrock_runtime::{BedrockRuntime, TITAN_EMBED_G1_DIMENSIONS};
//!
//! let client = Arc::new(BedrockRuntime::from_env()?);
//! let pipeline = Arc::new(
//!     RagPipeline::builder()
//!         .embedding_provider(Arc::new(TitanEmbeddingProvider::new(client.clone())))
//!         .vector_store(Arc::new(InMemoryVectorStore::new(TITAN_EMBED_G1_DIMENSIONS)))
//!         .build()?,
//! );
//! pipeline.ingest(&document).await?;
//!
//! let qa = RetrievalQa::new(
//!     pipeline,
//!     Arc::new(TitanTextGenerator::new(client)),
//!     PromptTemplate::new("{{context}}\nBased on the information above, {{question}}"),
//! );
//! let answer = qa.answer("which models support embeddings?").await?;
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod inmemory;
#[cfg(feature = "loader")]
pub mod loader;
#[cfg(feature = "pgvector")]
pub mod pgvector;
pub mod pipeline;
pub mod prompt;
pub mod qa;
#[cfg(feature = "bedrock")]
pub mod titan;
pub mod vectorstore;

pub use chunking::{Chunker, RecursiveChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, ScoredChunk};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use generation::TextGenerator;
pub use inmemory::InMemoryVectorStore;
#[cfg(feature = "loader")]
pub use loader::HtmlLoader;
#[cfg(feature = "pgvector")]
pub use pgvector::PgVectorStore;
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use prompt::PromptTemplate;
pub use qa::RetrievalQa;
#[cfg(feature = "bedrock")]
pub use titan::{TitanEmbeddingProvider, TitanTextGenerator};
pub use vectorstore::{VectorStore, cosine_similarity};
