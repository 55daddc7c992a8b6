//! Search behaviour of the in-memory store backing a docqa index.

use std::collections::HashMap;

use docqa_rag::document::Chunk;
use docqa_rag::inmemory::InMemoryVectorStore;
use docqa_rag::vectorstore::VectorStore;
use proptest::prelude::*;

const COLLECTION: &str = "documents";

fn chunk(document_id: &str, index: usize, text: &str, embedding: Vec<f32>) -> Chunk {
    Chunk {
        id: format!("{document_id}_{index}"),
        text: text.to_string(),
        embedding,
        metadata: HashMap::from([("chunk_index".to_string(), index.to_string())]),
        document_id: document_id.to_string(),
    }
}

async fn store_with(chunks: &[Chunk]) -> InMemoryVectorStore {
    let store = InMemoryVectorStore::new();
    store.create_collection(COLLECTION, 3).await.unwrap();
    store.upsert(COLLECTION, chunks).await.unwrap();
    store
}

fn run<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(future)
}

fn arb_embedding() -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, 3)
        .prop_filter("non-zero embedding", |v| v.iter().any(|x| x.abs() > 1e-3))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A document's chunks come back best first, capped at `top_k`.
    #[test]
    fn search_is_best_first_and_capped(
        embeddings in proptest::collection::vec(arb_embedding(), 1..12),
        query in arb_embedding(),
        top_k in 1usize..16,
    ) {
        let chunks: Vec<Chunk> = embeddings
            .into_iter()
            .enumerate()
            .map(|(i, e)| chunk("handbook.docx", i, "passage", e))
            .collect();

        let results = run(async {
            store_with(&chunks).await.search(COLLECTION, &query, top_k).await.unwrap()
        });

        prop_assert_eq!(results.len(), top_k.min(chunks.len()));
        for pair in results.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }

    /// Chunks with identical embeddings tie, and ties are ordered by chunk id.
    #[test]
    fn equal_scores_are_ordered_by_chunk_id(
        documents in proptest::collection::hash_set("[a-z]{1,6}\\.txt", 2..8),
        shared in arb_embedding(),
    ) {
        let chunks: Vec<Chunk> =
            documents.iter().map(|doc| chunk(doc, 0, "same text", shared.clone())).collect();

        let results = run(async {
            store_with(&chunks).await.search(COLLECTION, &shared, chunks.len()).await.unwrap()
        });

        let ids: Vec<&str> = results.iter().map(|r| r.chunk.id.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        prop_assert_eq!(ids, sorted);
    }
}

#[tokio::test]
async fn upserting_an_existing_chunk_id_replaces_it() {
    let store = store_with(&[
        chunk("policy.txt", 0, "old wording", vec![1.0, 0.0, 0.0]),
        chunk("policy.txt", 1, "second part", vec![0.0, 1.0, 0.0]),
    ])
    .await;
    assert_eq!(store.count(COLLECTION).await.unwrap(), 2);

    store
        .upsert(COLLECTION, &[chunk("policy.txt", 0, "new wording", vec![1.0, 0.0, 0.0])])
        .await
        .unwrap();
    assert_eq!(store.count(COLLECTION).await.unwrap(), 2);

    let results = store.search(COLLECTION, &[1.0, 0.0, 0.0], 1).await.unwrap();
    assert_eq!(results[0].chunk.text, "new wording");
}

#[tokio::test]
async fn recreating_a_collection_keeps_its_chunks() {
    let store = store_with(&[chunk("notes.txt", 0, "kept", vec![0.0, 0.0, 1.0])]).await;
    store.create_collection(COLLECTION, 3).await.unwrap();
    assert_eq!(store.count(COLLECTION).await.unwrap(), 1);
}

#[tokio::test]
async fn opposed_chunks_are_returned_with_negative_scores() {
    let store = store_with(&[
        chunk("a.txt", 0, "first", vec![1.0, 0.0, 0.0]),
        chunk("b.txt", 0, "second", vec![1.0, 0.1, 0.0]),
    ])
    .await;

    let results = store.search(COLLECTION, &[-1.0, 0.2, 0.0], 4).await.unwrap();

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.score < 0.0));
    assert_eq!(results[0].chunk.id, "b.txt_0");
}
