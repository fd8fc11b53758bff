//! Prompt templates with `{{name}}` placeholders.
//!
//! A [`PromptTemplate`] holds the raw template text; [`PromptTemplate::render`]
//! substitutes every placeholder from a binding map and fails with
//! [`RagError::MissingBinding`] when a placeholder has no binding. Bindings
//! that match no placeholder are ignored.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::document::ScoredChunk;
use crate::error::{RagError, Result};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("placeholder pattern is valid"));

/// Separator between retrieved chunk texts in an assembled context block.
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Binding name for the retrieved-context slot.
pub const CONTEXT_KEY: &str = "context";

/// Binding name for the user-question slot.
pub const QUESTION_KEY: &str = "question";

/// A text template whose `{{name}}` placeholders are filled at render time.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self { template: template.into() }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Substitute every placeholder with its binding.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::MissingBinding`] naming the first placeholder
    /// (in template order) that has no entry in `bindings`.
    pub fn render(&self, bindings: &HashMap<String, String>) -> Result<String> {
        for caps in PLACEHOLDER.captures_iter(&self.template) {
            let name = &caps[1];
            if !bindings.contains_key(name) {
                return Err(RagError::MissingBinding(name.to_string()));
            }
        }

        let rendered = PLACEHOLDER.replace_all(&self.template, |caps: &regex::Captures| {
            bindings[&caps[1]].clone()
        });
        Ok(rendered.into_owned())
    }
}

/// Join retrieved chunk texts into one context block, best match first.
pub fn join_context(results: &[ScoredChunk]) -> String {
    results.iter().map(|r| r.chunk.text.as_str()).collect::<Vec<_>>().join(CONTEXT_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Chunk;

    fn bindings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_render_replaces_placeholders() {
        let template = PromptTemplate::new("{{context}} {{question}}");
        let out = template.render(&bindings(&[("context", "C"), ("question", "Q")])).unwrap();
        assert_eq!(out, "C Q");
    }

    #[test]
    fn test_render_missing_binding() {
        let template = PromptTemplate::new("{{context}} {{question}}");
        let err = template.render(&bindings(&[("context", "C")])).unwrap_err();
        match err {
            RagError::MissingBinding(name) => assert_eq!(name, "question"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_render_ignores_unused_bindings() {
        let template = PromptTemplate::new("{{question}}");
        let out = template
            .render(&bindings(&[("question", "Q"), ("context", "unused")]))
            .unwrap();
        assert_eq!(out, "Q");
    }

    #[test]
    fn test_render_repeated_placeholder() {
        let template = PromptTemplate::new("{{x}} and {{x}}");
        let out = template.render(&bindings(&[("x", "again")])).unwrap();
        assert_eq!(out, "again and again");
    }

    #[test]
    fn test_render_without_placeholders_is_identity() {
        let template = PromptTemplate::new("no placeholders here");
        let out = template.render(&HashMap::new()).unwrap();
        assert_eq!(out, "no placeholders here");
    }

    #[test]
    fn test_join_context_inserts_blank_lines() {
        let results: Vec<ScoredChunk> = ["first", "second"]
            .iter()
            .enumerate()
            .map(|(i, text)| ScoredChunk {
                chunk: Chunk {
                    id: format!("doc_{i}"),
                    text: text.to_string(),
                    embedding: vec![],
                    metadata: HashMap::new(),
                    document_id: "doc".to_string(),
                },
                score: 1.0,
            })
            .collect();
        assert_eq!(join_context(&results), "first\n\nsecond");
    }
}
