//! # RAG Chat Demo
//!
//! Retrieval-augmented chat over a web page, backed by Postgres with the
//! pgvector extension.
//!
//! Load phase: fetch `SOURCE_URL` (default: the Bedrock Studio guide),
//! chunk it, embed the chunks with Titan Embeddings G1 and store them.
//! Query phase: each question is answered with the five most similar
//! chunks as context, via Titan Text Premier.
//!
//! Needs a reachable Postgres with pgvector, e.g.:
//! `docker run -p 5432:5432 -e POSTGRES_PASSWORD=postgres pgvector/pgvector:pg17`
//! Override the connection string with `DATABASE_URL`.
//!
//! Run: `cargo run -p bedrock-demos --bin rag-chat`

use std::sync::Arc;

use bedrock_rag::loader::HtmlLoader;
use bedrock_rag::pgvector::PgVectorStore;
use bedrock_rag::prompt::PromptTemplate;
use bedrock_rag::titan::{TitanEmbeddingProvider, TitanTextGenerator};
use bedrock_rag::{RagConfig, RagPipeline, RetrievalQa};
use bedrock_runtime::{BedrockRuntime, TITAN_EMBED_G1_DIMENSIONS, TITAN_TEXT_PREMIER_MAX_TOKENS};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::error;

const DEFAULT_SOURCE_URL: &str =
    "https://docs.aws.amazon.com/bedrock/latest/userguide/br-studio.html";

const NUM_OF_RESULTS: usize = 5;

/// Knowledge-base prompt for Titan Text Premier.
const RAG_PROMPT_TEMPLATE: &str = "
A chat between a curious User and an artificial intelligence Bot. The Bot gives helpful, detailed, and polite answers to the User's questions.

In this session, the model has access to search results and a user's question, your job is to answer the user's question using only information from the search results.

Model Instructions:
- You should provide concise answer to simple questions when the answer is directly contained in search results, but when comes to yes/no question, provide some details.
- In case the question requires multi-hop reasoning, you should find relevant information from search results and summarize the answer based on relevant information with logical reasoning.
- If the search results do not contain information that can answer the question, please state that you could not find an exact answer to the question, and if search results are completely irrelevant, say that you could not find an exact answer, then summarize search results.
- DO NOT USE INFORMATION THAT IS NOT IN SEARCH RESULTS!

User: {{question}}
Resource: Search Results: {{context}} Bot:";

/// `DATABASE_URL` wins; otherwise the local-dev Postgres with the
/// password query-escaped into the URL.
fn database_url() -> String {
    if let Ok(database_url) = std::env::var("DATABASE_URL") {
        return database_url;
    }

    let host = "localhost";
    let user = "postgres";
    let password = "postgres";
    let db_name = "postgres";
    let encoded: String = url::form_urlencoded::byte_serialize(password.as_bytes()).collect();
    format!("postgres://{user}:{encoded}@{host}:5432/{db_name}?sslmode=disable")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let client = Arc::new(BedrockRuntime::from_env()?);
    let store = PgVectorStore::connect(&database_url(), TITAN_EMBED_G1_DIMENSIONS).await?;
    println!("vector store ready");

    let pipeline = Arc::new(
        RagPipeline::builder()
            .config(RagConfig::builder().top_k(NUM_OF_RESULTS).build()?)
            .embedding_provider(Arc::new(TitanEmbeddingProvider::new(client.clone())))
            .vector_store(Arc::new(store))
            .build()?,
    );

    load(&pipeline).await?;

    let qa = RetrievalQa::new(
        pipeline,
        Arc::new(
            TitanTextGenerator::new(client).with_max_token_count(TITAN_TEXT_PREMIER_MAX_TOKENS),
        ),
        PromptTemplate::new(RAG_PROMPT_TEMPLATE),
    );

    let mut rl = DefaultEditor::new()?;
    loop {
        match rl.readline("\nEnter your message: ") {
            Ok(line) => {
                let question = line.trim();
                if question.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(question);

                // A failed turn should not end the session.
                match qa.answer(question).await {
                    Ok(answer) => println!("[Model response]: {answer}"),
                    Err(e) => error!(error = %e, "turn failed"),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

/// Fetch the source page and ingest it into the vector store.
async fn load(pipeline: &RagPipeline) -> anyhow::Result<()> {
    let source =
        std::env::var("SOURCE_URL").unwrap_or_else(|_| DEFAULT_SOURCE_URL.to_string());
    println!("loading data from {source}");

    let document = HtmlLoader::new().load(&source).await?;
    let chunks = pipeline.ingest(&document).await?;

    println!("no. of document chunks to be loaded {}", chunks.len());
    println!("data successfully loaded into vector store");
    Ok(())
}
