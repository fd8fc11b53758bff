//! Property tests for recursive document chunking.

use bedrock_rag::chunking::{CHUNK_INDEX_KEY, Chunker, OVERLAP_KEY, RecursiveChunker};
use bedrock_rag::document::{Chunk, Document};
use proptest::prelude::*;

/// Prose-like text: words plus the separators the splitter knows about.
fn arb_prose() -> impl Strategy<Value = String> {
    "[a-zA-Z .!?\n]{0,400}"
}

/// Arbitrary unicode text, multibyte characters included.
fn arb_unicode() -> impl Strategy<Value = String> {
    proptest::collection::vec(any::<char>(), 0..150).prop_map(String::from_iter)
}

fn recorded_overlap(chunk: &Chunk) -> usize {
    chunk.metadata[OVERLAP_KEY].parse().unwrap()
}

/// Concatenate chunk texts minus each chunk's recorded overlap prefix.
fn reconstruct(chunks: &[Chunk]) -> String {
    let mut out = String::new();
    for chunk in chunks {
        out.push_str(&chunk.text[recorded_overlap(chunk)..]);
    }
    out
}

/// **Feature: bedrock-rag, Property 1: Chunk size bound**
/// *For any* input text, every produced chunk SHALL contain at most
/// chunk_size bytes.
mod prop_chunk_size_bound {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn no_chunk_exceeds_chunk_size(
            text in arb_prose(),
            chunk_size in 4usize..64,
            chunk_overlap in 0usize..64,
        ) {
            let chunker = RecursiveChunker::new(chunk_size, chunk_overlap);
            let chunks = chunker.chunk(&Document::new("doc", text));

            for chunk in &chunks {
                prop_assert!(
                    chunk.text.len() <= chunk_size,
                    "chunk of {} bytes exceeds limit {}",
                    chunk.text.len(),
                    chunk_size,
                );
            }
        }
    }
}

/// **Feature: bedrock-rag, Property 2: Lossless reconstruction**
/// *For any* input text, concatenating the chunks minus their recorded
/// overlap prefixes SHALL reproduce the input byte for byte, and chunk
/// ids and indices SHALL follow document order.
mod prop_lossless_reconstruction {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn stripping_overlaps_restores_the_input(
            text in arb_prose(),
            chunk_size in 4usize..64,
            chunk_overlap in 0usize..64,
        ) {
            let chunker = RecursiveChunker::new(chunk_size, chunk_overlap);
            let chunks = chunker.chunk(&Document::new("doc", text.clone()));

            prop_assert_eq!(reconstruct(&chunks), text);

            for (i, chunk) in chunks.iter().enumerate() {
                prop_assert_eq!(&chunk.id, &format!("doc_{i}"));
                prop_assert_eq!(&chunk.metadata[CHUNK_INDEX_KEY], &i.to_string());
                prop_assert_eq!(&chunk.document_id, "doc");
            }
        }
    }
}

/// **Feature: bedrock-rag, Property 3: Overlap is a shared suffix**
/// *For any* input text, each chunk's recorded overlap prefix SHALL be a
/// suffix of the previous chunk and SHALL not exceed the configured
/// overlap.
mod prop_overlap_shared_with_previous {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn overlap_prefix_repeats_previous_tail(
            text in arb_prose(),
            chunk_size in 4usize..64,
            chunk_overlap in 0usize..64,
        ) {
            let chunker = RecursiveChunker::new(chunk_size, chunk_overlap);
            let chunks = chunker.chunk(&Document::new("doc", text));

            prop_assert!(chunks.first().is_none_or(|c| recorded_overlap(c) == 0));

            for window in chunks.windows(2) {
                let overlap = recorded_overlap(&window[1]);
                prop_assert!(overlap <= chunk_overlap.min(chunk_size - 1));
                prop_assert!(
                    window[0].text.ends_with(&window[1].text[..overlap]),
                    "overlap prefix {:?} is not a suffix of {:?}",
                    &window[1].text[..overlap],
                    window[0].text,
                );
            }
        }
    }
}

/// **Feature: bedrock-rag, Property 4: Small inputs stay whole**
/// *For any* text no longer than chunk_size, the chunker SHALL return a
/// single chunk equal to the input; empty text SHALL produce no chunks.
mod prop_small_inputs_stay_whole {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn text_within_limit_is_one_chunk(
            text in arb_prose(),
            chunk_overlap in 0usize..64,
        ) {
            let chunk_size = text.len().max(4);
            let chunker = RecursiveChunker::new(chunk_size, chunk_overlap);
            let chunks = chunker.chunk(&Document::new("doc", text.clone()));

            if text.is_empty() {
                prop_assert!(chunks.is_empty());
            } else {
                prop_assert_eq!(chunks.len(), 1);
                prop_assert_eq!(&chunks[0].text, &text);
                prop_assert_eq!(recorded_overlap(&chunks[0]), 0);
            }
        }
    }
}

/// **Feature: bedrock-rag, Property 5: Multibyte input is safe**
/// *For any* unicode text, chunking SHALL not panic, SHALL respect the
/// size bound and SHALL reconstruct losslessly.
mod prop_multibyte_input_is_safe {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn unicode_chunks_stay_bounded_and_lossless(
            text in arb_unicode(),
            chunk_size in 4usize..64,
            chunk_overlap in 0usize..64,
        ) {
            let chunker = RecursiveChunker::new(chunk_size, chunk_overlap);
            let chunks = chunker.chunk(&Document::new("doc", text.clone()));

            // A single char can be up to 4 bytes, so the bound still
            // holds at the smallest sizes generated here.
            for chunk in &chunks {
                prop_assert!(chunk.text.len() <= chunk_size);
            }
            prop_assert_eq!(reconstruct(&chunks), text);
        }
    }
}

#[test]
fn test_paragraphs_split_before_sentences() {
    let text = "First paragraph here.\n\nSecond paragraph is a bit longer. It has two sentences.";
    let chunker = RecursiveChunker::new(40, 0);
    let chunks = chunker.chunk(&Document::new("doc", text));

    assert!(chunks.len() >= 2);
    assert_eq!(chunks[0].text, "First paragraph here.\n\n");
    assert_eq!(reconstruct(&chunks), text);
}

#[test]
fn test_chunks_inherit_document_metadata() {
    let mut document = Document::new("doc", "word ".repeat(40));
    document.metadata.insert("source".to_string(), "unit-test".to_string());

    let chunker = RecursiveChunker::new(32, 8);
    let chunks = chunker.chunk(&document);

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert_eq!(chunk.metadata["source"], "unit-test");
        assert!(chunk.embedding.is_empty());
    }
}
