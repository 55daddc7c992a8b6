//! Turning chunk text and questions into vectors.

use async_trait::async_trait;

use crate::error::Result;

/// Maps text to a fixed-length vector so passages and questions can be
/// compared by cosine similarity.
///
/// Ingestion embeds every chunk of a run through [`embed_batch`], and each
/// question goes through [`embed`] with the same provider, so both sides of a
/// comparison come from one model.
///
/// [`embed`]: EmbeddingProvider::embed
/// [`embed_batch`]: EmbeddingProvider::embed_batch
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// One vector per input, in input order. Falls back to one [`embed`]
    /// call per text; HTTP providers send several texts per request instead.
    ///
    /// [`embed`]: EmbeddingProvider::embed
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }

    /// Length of every vector this provider returns.
    fn dimensions(&self) -> usize;
}
