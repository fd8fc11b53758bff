//! HTML document loading.
//!
//! [`HtmlLoader`] fetches a page over HTTP and reduces its markup to plain
//! text suitable for chunking: tags are stripped, script/style/head content
//! is dropped, character entities are decoded, and block-level elements
//! become line breaks (paragraphs and headings become blank lines, so
//! paragraph structure survives into the chunker's separator hierarchy).

use std::collections::HashMap;

use tracing::debug;

use crate::document::Document;
use crate::error::{RagError, Result};

/// Elements whose text content is not document text.
const SKIP_CONTENT_TAGS: [&str; 5] = ["script", "style", "noscript", "head", "template"];

/// Elements rendered as a paragraph break (blank line).
const PARAGRAPH_TAGS: [&str; 7] = ["p", "h1", "h2", "h3", "h4", "h5", "h6"];

/// Elements rendered as a single line break.
const LINE_TAGS: [&str; 18] = [
    "br", "li", "ul", "ol", "dt", "dd", "tr", "table", "div", "section", "article", "header",
    "footer", "nav", "main", "blockquote", "pre", "hr",
];

/// Fetches a URL and converts the HTML body into a [`Document`].
#[derive(Debug, Clone, Default)]
pub struct HtmlLoader {
    http: reqwest::Client,
}

impl HtmlLoader {
    pub fn new() -> Self {
        Self { http: reqwest::Client::new() }
    }

    /// Use a preconfigured HTTP client (proxies, timeouts).
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Fetch `url` and return its readable text as a [`Document`] whose id
    /// and `source_uri` are the URL itself.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Fetch`] on network failure or any non-2xx
    /// status.
    pub async fn load(&self, url: &str) -> Result<Document> {
        let response = self.http.get(url).send().await.map_err(|e| RagError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RagError::Fetch {
                url: url.to_string(),
                message: format!("HTTP status {status}"),
            });
        }

        let body = response.text().await.map_err(|e| RagError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        let text = html_to_text(&body);
        debug!(url, html_bytes = body.len(), text_bytes = text.len(), "extracted document text");

        let mut metadata = HashMap::new();
        metadata.insert("source".to_string(), url.to_string());
        Ok(Document {
            id: url.to_string(),
            text,
            metadata,
            source_uri: Some(url.to_string()),
        })
    }
}

/// Strip markup from an HTML fragment, returning normalized plain text.
///
/// Line breaks mark block boundaries and blank lines mark paragraph
/// boundaries; all other whitespace collapses to single spaces.
pub fn html_to_text(html: &str) -> String {
    // Lowered copy for case-insensitive close-tag searches. ASCII
    // lowering keeps byte offsets identical to the original.
    let lower = html.to_ascii_lowercase();
    let mut raw = String::with_capacity(html.len() / 4);
    let mut i = 0;

    while i < html.len() {
        let rest = &html[i..];

        if let Some(after) = rest.strip_prefix("<!--") {
            i += match after.find("-->") {
                Some(p) => 4 + p + 3,
                None => rest.len(),
            };
            continue;
        }

        if rest.starts_with('<') {
            let Some(close) = rest.find('>') else {
                // Truncated tag at end of input.
                break;
            };
            let tag = &rest[1..close];
            i += close + 1;

            let is_closing = tag.starts_with('/');
            let name: String = tag
                .trim_start_matches('/')
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_ascii_lowercase();

            if PARAGRAPH_TAGS.contains(&name.as_str()) {
                ensure_line_breaks(&mut raw, 2);
            } else if LINE_TAGS.contains(&name.as_str()) {
                ensure_line_breaks(&mut raw, 1);
            } else if name == "td" || name == "th" {
                raw.push(' ');
            }

            if !is_closing && SKIP_CONTENT_TAGS.contains(&name.as_str()) {
                let close_tag = format!("</{name}");
                i = match lower[i..].find(&close_tag) {
                    Some(p) => {
                        let after_close = i + p + close_tag.len();
                        match html[after_close..].find('>') {
                            Some(q) => after_close + q + 1,
                            None => html.len(),
                        }
                    }
                    None => html.len(),
                };
            }
            continue;
        }

        if rest.starts_with('&') {
            if let Some((ch, len)) = decode_entity(rest) {
                raw.push(ch);
                i += len;
                continue;
            }
            raw.push('&');
            i += 1;
            continue;
        }

        let next = rest.find(['<', '&']).unwrap_or(rest.len());
        for ch in rest[..next].chars() {
            // Source whitespace carries no structure; only tag-derived
            // newlines do.
            raw.push(if matches!(ch, '\n' | '\r' | '\t') { ' ' } else { ch });
        }
        i += next;
    }

    normalize_whitespace(&raw)
}

/// Extend the trailing newline run to `want` newlines. Opening and
/// closing tags both request breaks; adjacent block edges must not
/// stack into a paragraph break.
fn ensure_line_breaks(raw: &mut String, want: usize) {
    let have = raw.chars().rev().take_while(|&c| c == '\n').count();
    for _ in have..want {
        raw.push('\n');
    }
}

/// Decode one entity at the start of `rest` (which begins with `&`),
/// returning the character and the entity's byte length.
fn decode_entity(rest: &str) -> Option<(char, usize)> {
    let semi = rest.char_indices().take(12).find(|&(_, c)| c == ';').map(|(idx, _)| idx)?;
    let entity = &rest[1..semi];
    let ch = match entity {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        _ => {
            let code = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))?;
            char::from_u32(code)?
        }
    };
    Some((ch, semi + 1))
}

/// Collapse space runs to one space and newline runs to at most a blank
/// line, trimming each line and the ends of the text.
fn normalize_whitespace(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut newlines = 0usize;
    let mut space = false;

    for ch in raw.chars() {
        match ch {
            '\n' => {
                newlines += 1;
                space = false;
            }
            c if c.is_whitespace() => {
                if newlines == 0 {
                    space = true;
                }
            }
            c => {
                if !out.is_empty() {
                    if newlines > 1 {
                        out.push_str("\n\n");
                    } else if newlines == 1 {
                        out.push('\n');
                    } else if space {
                        out.push(' ');
                    }
                }
                newlines = 0;
                space = false;
                out.push(c);
            }
        }
    }
    out
}
