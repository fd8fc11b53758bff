//! Retrieval-augmented question answering.
//!
//! [`RetrievalQa`] packages one query turn: retrieve context for the
//! question, render it into a [`PromptTemplate`] and hand the prompt to a
//! [`TextGenerator`]. Templates must use the `{{context}}` and
//! `{{question}}` slots.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::generation::TextGenerator;
use crate::pipeline::RagPipeline;
use crate::prompt::{self, CONTEXT_KEY, PromptTemplate, QUESTION_KEY};

/// Answers questions with context retrieved from a [`RagPipeline`].
pub struct RetrievalQa {
    pipeline: Arc<RagPipeline>,
    generator: Arc<dyn TextGenerator>,
    template: PromptTemplate,
}

impl RetrievalQa {
    pub fn new(
        pipeline: Arc<RagPipeline>,
        generator: Arc<dyn TextGenerator>,
        template: PromptTemplate,
    ) -> Self {
        Self { pipeline, generator, template }
    }

    pub fn pipeline(&self) -> &Arc<RagPipeline> {
        &self.pipeline
    }

    /// Run one retrieve-then-generate turn for `question`.
    ///
    /// The question is trimmed before use. An empty store yields an empty
    /// context block, not an error.
    pub async fn answer(&self, question: &str) -> Result<String> {
        let question = question.trim();
        let results = self.pipeline.retrieve(question).await?;
        let context = prompt::join_context(&results);

        let mut bindings = HashMap::new();
        bindings.insert(CONTEXT_KEY.to_string(), context);
        bindings.insert(QUESTION_KEY.to_string(), question.to_string());
        let rendered = self.template.render(&bindings)?;
        debug!(
            context_chunks = results.len(),
            prompt_bytes = rendered.len(),
            "rendered retrieval prompt"
        );

        self.generator.generate(&rendered).await
    }
}
