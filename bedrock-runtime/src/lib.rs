//! Minimal Amazon Bedrock Runtime client.
//!
//! Talks to the `InvokeModel` REST endpoint directly over `reqwest` with
//! hand-rolled SigV4 signing, so no AWS SDK is required. Ships typed
//! payloads and wrappers for the Titan text-generation and text-embedding
//! models.
//!
//! Credentials come from the standard environment variables
//! (`AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, optional
//! `AWS_SESSION_TOKEN`); the region comes from `AWS_REGION` and defaults
//! to `us-east-1`.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use bedrock_runtime::{BedrockRuntime, TitanText};
//!
//! # async fn run() -> bedrock_runtime::Result<()> {
//! let client = Arc::new(BedrockRuntime::from_env()?);
//! let titan = TitanText::new(client);
//! let answer = titan.generate("Explain AI in 100 words or less.").await?;
//! println!("{answer}");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod credentials;
pub mod error;
pub mod sigv4;
pub mod titan;

pub use client::BedrockRuntime;
pub use credentials::{Credentials, DEFAULT_REGION, region_from_env};
pub use error::{BedrockError, Result};
pub use titan::{
    TITAN_EMBED_G1_DIMENSIONS, TITAN_EMBED_G1_TEXT, TITAN_TEXT_PREMIER,
    TITAN_TEXT_PREMIER_MAX_TOKENS, TitanEmbedder, TitanText,
};
