//! # Document Chat Demo
//!
//! Chat with a single web page: the page text is stuffed into a
//! question-answering prompt and Titan Text Premier answers from it. No
//! vector store involved; the whole document is the context every turn.
//!
//! Override the page with `SOURCE_URL` (default: the Bedrock model-ids
//! guide). Credentials and region come from the usual `AWS_*` variables.
//!
//! Run: `cargo run -p bedrock-demos --bin doc-chat`

use std::collections::HashMap;
use std::sync::Arc;

use bedrock_rag::loader::HtmlLoader;
use bedrock_rag::prompt::{PromptTemplate, CONTEXT_KEY, QUESTION_KEY};
use bedrock_rag::titan::TitanTextGenerator;
use bedrock_rag::TextGenerator;
use bedrock_runtime::{BedrockRuntime, TITAN_TEXT_PREMIER_MAX_TOKENS};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::error;

const DEFAULT_SOURCE_URL: &str =
    "https://docs.aws.amazon.com/bedrock/latest/userguide/model-ids.html";

/// Question-answering-with-context prompt from the Bedrock prompt guide.
const PROMPT_TEMPLATE: &str = "{{context}}\nBased on the information above, {{question}}";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let client = Arc::new(BedrockRuntime::from_env()?);
    let generator =
        TitanTextGenerator::new(client).with_max_token_count(TITAN_TEXT_PREMIER_MAX_TOKENS);
    let template = PromptTemplate::new(PROMPT_TEMPLATE);

    let link =
        std::env::var("SOURCE_URL").unwrap_or_else(|_| DEFAULT_SOURCE_URL.to_string());
    let document = HtmlLoader::new().load(&link).await?;
    println!("loaded content from {link}");

    let mut rl = DefaultEditor::new()?;
    loop {
        match rl.readline("\nEnter your message: ") {
            Ok(line) => {
                let question = line.trim();
                if question.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(question);

                let mut bindings = HashMap::new();
                bindings.insert(CONTEXT_KEY.to_string(), document.text.clone());
                bindings.insert(QUESTION_KEY.to_string(), question.to_string());

                // A failed turn should not end the session.
                match ask(&generator, &template, &bindings).await {
                    Ok(answer) => println!("[Response from model]: {answer}"),
                    Err(e) => error!(error = %e, "turn failed"),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

async fn ask(
    generator: &TitanTextGenerator,
    template: &PromptTemplate,
    bindings: &HashMap<String, String>,
) -> bedrock_rag::Result<String> {
    let prompt = template.render(bindings)?;
    generator.generate(&prompt).await
}
