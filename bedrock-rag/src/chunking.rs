//! Document chunking.
//!
//! This module provides the [`Chunker`] trait and [`RecursiveChunker`],
//! which splits hierarchically by paragraphs, sentences, then words before
//! falling back to a hard cutoff. Sizes are byte counts; every cut lands
//! on a `char` boundary, so multibyte text never panics or breaks apart.

use std::ops::Range;

use tracing::debug;

use crate::document::{Chunk, Document};

/// Separator hierarchy tried in order when a piece exceeds the size limit.
const SEPARATORS: [&str; 5] = ["\n\n", ". ", "! ", "? ", " "];

/// Metadata key holding the chunk's position within its document.
pub const CHUNK_INDEX_KEY: &str = "chunk_index";
/// Metadata key holding the number of leading bytes shared with the
/// previous chunk.
pub const OVERLAP_KEY: &str = "overlap";

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text and metadata but no
/// embeddings. Embeddings are attached later by the pipeline.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` if the document has empty text.
    /// Each returned chunk has an empty embedding vector.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Splits text hierarchically: paragraphs → sentences → words → bytes.
///
/// Segments are merged greedily up to the size limit, and every chunk
/// after the first is prefixed with the trailing `chunk_overlap` bytes of
/// the text preceding it. The exact prefix length is recorded in the
/// chunk's `overlap` metadata, so stripping those prefixes and
/// concatenating what remains reproduces the original text byte for byte.
///
/// Texts no longer than `chunk_size` come back as a single chunk equal to
/// the input. Chunk IDs are `{document_id}_{chunk_index}`; each chunk
/// inherits the parent document's metadata plus `chunk_index` and
/// `overlap` fields.
///
/// `chunk_overlap` must be smaller than `chunk_size`. The
/// [`RagConfig`](crate::RagConfig) builder enforces this for
/// pipeline-constructed chunkers; a larger value is capped here so the
/// splitter still makes progress. A chunk exceeds `chunk_size` only when
/// the limit is smaller than one character.
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveChunker {
    /// Create a new `RecursiveChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` — maximum number of bytes per chunk
    /// * `chunk_overlap` — number of overlapping bytes between consecutive chunks
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.is_empty() {
            return Vec::new();
        }

        let pieces = split_pieces(&document.text, self.chunk_size, self.chunk_overlap);
        debug!(document.id = %document.id, chunk_count = pieces.len(), "chunked document");

        pieces
            .into_iter()
            .enumerate()
            .map(|(i, piece)| {
                let mut metadata = document.metadata.clone();
                metadata.insert(CHUNK_INDEX_KEY.to_string(), i.to_string());
                metadata.insert(OVERLAP_KEY.to_string(), piece.overlap.to_string());
                Chunk {
                    id: format!("{}_{i}", document.id),
                    text: piece.text,
                    embedding: Vec::new(),
                    metadata,
                    document_id: document.id.clone(),
                }
            })
            .collect()
    }
}

/// A chunk's text plus how many of its leading bytes repeat the previous
/// chunk's tail.
struct Piece {
    text: String,
    overlap: usize,
}

/// Split `text` into base ranges of at most `chunk_size - chunk_overlap`
/// bytes, then widen every range after the first with an overlap prefix.
///
/// Reserving the overlap up front keeps widened chunks within
/// `chunk_size`; the base ranges partition the text, which is what makes
/// reconstruction lossless.
fn split_pieces(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<Piece> {
    if text.len() <= chunk_size {
        return vec![Piece { text: text.to_string(), overlap: 0 }];
    }

    let overlap = chunk_overlap.min(chunk_size.saturating_sub(1));
    let base_size = chunk_size - overlap;
    let bases = split_ranges(text, 0..text.len(), base_size, &SEPARATORS);

    bases
        .iter()
        .enumerate()
        .map(|(i, base)| {
            if i == 0 {
                return Piece { text: text[base.clone()].to_string(), overlap: 0 };
            }
            // A hard-cut base can be a single char wider than the
            // reserved base size; shrink the prefix so the widened
            // chunk stays within chunk_size.
            let budget = chunk_size.saturating_sub(base.len());
            // Snapping forward to a char boundary only ever shrinks the
            // prefix, never the base.
            let mut start = base.start.saturating_sub(overlap.min(budget));
            while !text.is_char_boundary(start) {
                start += 1;
            }
            Piece { text: text[start..base.end].to_string(), overlap: base.start - start }
        })
        .collect()
}

/// Partition `range` into contiguous subranges of at most `max_len` bytes,
/// preferring the given separators in order. The returned ranges cover
/// `range` exactly, in order, with no gaps.
fn split_ranges(
    text: &str,
    range: Range<usize>,
    max_len: usize,
    separators: &[&str],
) -> Vec<Range<usize>> {
    if range.len() <= max_len {
        return vec![range];
    }
    let Some((separator, rest)) = separators.split_first() else {
        return hard_cut(text, range, max_len);
    };

    let segments = split_after(text, range.clone(), separator);
    if segments.len() == 1 {
        // Separator absent at this level — try the next one.
        return split_ranges(text, range, max_len, rest);
    }

    // Greedily merge segments up to max_len, recursing into any single
    // segment that is still too long on its own.
    let mut out = Vec::new();
    let mut current = range.start..range.start;
    for segment in segments {
        if current.len() + segment.len() <= max_len {
            current.end = segment.end;
        } else {
            if !current.is_empty() {
                out.push(current.clone());
            }
            if segment.len() > max_len {
                out.extend(split_ranges(text, segment.clone(), max_len, rest));
                current = segment.end..segment.end;
            } else {
                current = segment;
            }
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Split a range after each occurrence of `separator`, keeping the
/// separator attached to the preceding piece so no bytes are dropped.
fn split_after(text: &str, range: Range<usize>, separator: &str) -> Vec<Range<usize>> {
    let slice = &text[range.clone()];
    let mut out = Vec::new();
    let mut start = 0;
    while let Some(pos) = slice[start..].find(separator) {
        let end = start + pos + separator.len();
        out.push(range.start + start..range.start + end);
        start = end;
    }
    if start < slice.len() {
        out.push(range.start + start..range.start + slice.len());
    }
    out
}

/// Last-resort split every `max_len` bytes, snapped back to `char`
/// boundaries. A single char wider than `max_len` becomes its own
/// oversized piece rather than being broken apart.
fn hard_cut(text: &str, range: Range<usize>, max_len: usize) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    let mut start = range.start;
    while start < range.end {
        let mut end = (start + max_len.max(1)).min(range.end);
        while end < range.end && !text.is_char_boundary(end) {
            end -= 1;
        }
        if end <= start {
            end = start + text[start..].chars().next().map_or(1, char::len_utf8);
        }
        out.push(start..end);
        start = end;
    }
    out
}
