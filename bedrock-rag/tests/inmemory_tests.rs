//! Property and behavior tests for in-memory vector store queries.

use std::collections::HashMap;

use bedrock_rag::document::Chunk;
use bedrock_rag::error::RagError;
use bedrock_rag::inmemory::InMemoryVectorStore;
use bedrock_rag::vectorstore::VectorStore;
use proptest::prelude::*;

const DIM: usize = 16;

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map(
        "non-zero embedding",
        |mut v| {
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm < 1e-8 {
                return None;
            }
            for val in &mut v {
                *val /= norm;
            }
            Some(v)
        },
    )
}

/// Generate a chunk with a normalized embedding.
fn arb_chunk(dim: usize) -> impl Strategy<Value = Chunk> {
    ("[a-z]{3,8}", "[a-z ]{5,30}", arb_normalized_embedding(dim)).prop_map(
        |(id, text, embedding)| Chunk {
            id,
            text,
            embedding,
            metadata: HashMap::new(),
            document_id: "doc_1".to_string(),
        },
    )
}

fn chunk_with_embedding(id: &str, embedding: Vec<f32>) -> Chunk {
    Chunk {
        id: id.to_string(),
        text: format!("text for {id}"),
        embedding,
        metadata: HashMap::new(),
        document_id: "doc_1".to_string(),
    }
}

/// **Feature: bedrock-rag, Property 1: Vector store query ordering**
/// *For any* set of chunks stored in an InMemoryVectorStore, querying with
/// an embedding SHALL return results ordered by descending cosine similarity
/// score, and the number of results SHALL be at most top_k.
mod prop_query_ordering {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn results_ordered_descending_and_bounded_by_top_k(
            chunks in proptest::collection::vec(arb_chunk(DIM), 1..20),
            query in arb_normalized_embedding(DIM),
            top_k in 1usize..25,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let (results, count) = rt.block_on(async {
                let store = InMemoryVectorStore::new(DIM);
                store.add(&chunks).await.unwrap();
                let results = store.query(&query, top_k).await.unwrap();
                (results, chunks.len())
            });

            // Result count is at most top_k and at most the number of stored chunks
            prop_assert!(results.len() <= top_k);
            prop_assert!(results.len() <= count);

            // Results are ordered by descending score
            for window in results.windows(2) {
                prop_assert!(
                    window[0].score >= window[1].score,
                    "results not in descending order: {} < {}",
                    window[0].score,
                    window[1].score,
                );
            }
        }
    }
}

/// **Feature: bedrock-rag, Property 2: Query larger than store**
/// *For any* set of stored chunks, a query whose top_k is at least the
/// number of stored chunks SHALL return exactly one result per chunk.
mod prop_query_larger_than_store {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn oversized_top_k_returns_every_chunk(
            chunks in proptest::collection::vec(arb_chunk(DIM), 1..15),
            query in arb_normalized_embedding(DIM),
            extra in 0usize..10,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let (results, count) = rt.block_on(async {
                let store = InMemoryVectorStore::new(DIM);
                store.add(&chunks).await.unwrap();
                let results = store.query(&query, chunks.len() + extra).await.unwrap();
                (results, chunks.len())
            });

            prop_assert_eq!(results.len(), count);
        }
    }
}

/// **Feature: bedrock-rag, Property 3: Rejected batches change nothing**
/// *For any* batch containing one wrongly-sized embedding, add SHALL fail
/// with DimensionMismatch and SHALL leave the store contents unchanged.
mod prop_rejected_add_is_atomic {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn bad_batch_leaves_store_unchanged(
            initial in proptest::collection::vec(arb_chunk(DIM), 0..8),
            batch in proptest::collection::vec(arb_chunk(DIM), 1..8),
            bad_dims in 1usize..DIM,
            bad_pos in 0usize..8,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let (err, len_before, len_after) = rt.block_on(async {
                let store = InMemoryVectorStore::new(DIM);
                store.add(&initial).await.unwrap();
                let len_before = store.len().await;

                let mut batch = batch;
                let pos = bad_pos.min(batch.len() - 1);
                batch[pos].embedding = vec![0.5; bad_dims];
                let err = store.add(&batch).await.unwrap_err();

                (err, len_before, store.len().await)
            });

            let is_dimension_mismatch = matches!(
                err,
                RagError::DimensionMismatch { expected: DIM, actual } if actual == bad_dims
            );
            prop_assert!(is_dimension_mismatch);
            prop_assert_eq!(len_before, initial.len());
            prop_assert_eq!(len_after, len_before);
        }
    }
}

#[tokio::test]
async fn test_query_on_empty_store_returns_empty() {
    let store = InMemoryVectorStore::new(DIM);
    let results = store.query(&vec![0.5; DIM], 5).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_equal_scores_preserve_insertion_order() {
    let store = InMemoryVectorStore::new(4);
    let shared = vec![1.0, 0.0, 0.0, 0.0];
    let chunks = vec![
        chunk_with_embedding("first", shared.clone()),
        chunk_with_embedding("second", shared.clone()),
        chunk_with_embedding("third", shared.clone()),
    ];
    store.add(&chunks).await.unwrap();

    let results = store.query(&shared, 3).await.unwrap();
    let ids: Vec<&str> = results.iter().map(|r| r.chunk.id.as_str()).collect();
    assert_eq!(ids, ["first", "second", "third"]);
}

#[tokio::test]
async fn test_query_rejects_mismatched_dimension() {
    let store = InMemoryVectorStore::new(4);
    store.add(&[chunk_with_embedding("a", vec![1.0, 0.0, 0.0, 0.0])]).await.unwrap();

    let err = store.query(&[1.0, 0.0], 1).await.unwrap_err();
    assert!(matches!(err, RagError::DimensionMismatch { expected: 4, actual: 2 }));
}

#[tokio::test]
async fn test_closest_chunk_ranks_first() {
    let store = InMemoryVectorStore::new(3);
    let chunks = vec![
        chunk_with_embedding("x_axis", vec![1.0, 0.0, 0.0]),
        chunk_with_embedding("y_axis", vec![0.0, 1.0, 0.0]),
        chunk_with_embedding("diagonal", vec![0.7, 0.7, 0.0]),
    ];
    store.add(&chunks).await.unwrap();

    let results = store.query(&[0.9, 0.1, 0.0], 2).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].chunk.id, "x_axis");
    assert!(results[0].score > results[1].score);
}
