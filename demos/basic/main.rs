//! # Basic Titan Text Demo
//!
//! One-shot invocation of Titan Text Premier: sends a fixed prompt and
//! prints the completion.
//!
//! Credentials come from `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`
//! (optionally `AWS_SESSION_TOKEN`), the region from `AWS_REGION`
//! (default `us-east-1`). A `.env` file is honored.
//!
//! Run: `cargo run -p bedrock-demos --bin basic`

use std::sync::Arc;

use bedrock_runtime::{BedrockRuntime, TitanText, TITAN_TEXT_PREMIER_MAX_TOKENS};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let client = Arc::new(BedrockRuntime::from_env()?);
    let model = TitanText::new(client).with_max_token_count(TITAN_TEXT_PREMIER_MAX_TOKENS);

    let response = model.generate("Explain AI in 100 words or less.").await?;
    println!("response:\n {response}");

    Ok(())
}
