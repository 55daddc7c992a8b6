//! Where a run's embedded chunks are kept and searched.

use async_trait::async_trait;

use crate::document::{Chunk, SearchResult};
use crate::error::Result;

/// Holds embedded chunks in named collections and finds the ones nearest to
/// a question vector.
///
/// An ingestion run writes every chunk into one collection
/// ([`DOCUMENTS_COLLECTION`](crate::ingest::DOCUMENTS_COLLECTION)); questions
/// only ever read from it afterwards.
///
/// ```rust,ignore
/// let store = InMemoryVectorStore::new();
/// store.create_collection("documents", provider.dimensions()).await?;
/// store.upsert("documents", &chunks).await?;
/// let nearest = store.search("documents", &question_vector, 4).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Creating a collection that exists leaves its chunks in place.
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()>;

    /// Insert `chunks`, replacing any stored chunk with the same id.
    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()>;

    async fn count(&self, collection: &str) -> Result<usize>;

    /// The `top_k` chunks nearest to `embedding`, best first. Scores may be
    /// negative; no cut-off is applied here.
    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>>;
}
