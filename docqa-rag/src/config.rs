//! Chunking and retrieval settings for a docqa index.

use serde::{Deserialize, Serialize};

use crate::error::{IngestionError, Result};

/// How documents are cut up and how many passages a question gets back.
///
/// The defaults are the assistant's: 1000-character chunks with no overlap,
/// four passages per question, no score cut-off.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Characters per chunk.
    pub chunk_size: usize,
    /// Characters repeated at the start of each following chunk.
    pub chunk_overlap: usize,
    /// Passages returned for each question.
    pub top_k: usize,
    /// Optional cut-off on cosine similarity. `None` keeps every one of the
    /// `top_k` nearest chunks, however dissimilar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_threshold: Option<f32>,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self { chunk_size: 1000, chunk_overlap: 0, top_k: 4, similarity_threshold: None }
    }
}

impl RagConfig {
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Starts from [`RagConfig::default`]; [`build`](Self::build) checks the result.
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Drop retrieved chunks scoring below `threshold`.
    pub fn similarity_threshold(mut self, threshold: f32) -> Self {
        self.config.similarity_threshold = Some(threshold);
        self
    }

    /// # Errors
    ///
    /// [`IngestionError::ConfigError`] when the chunk size or `top_k` is zero,
    /// or the overlap is not smaller than the chunk size.
    pub fn build(self) -> Result<RagConfig> {
        let RagConfig { chunk_size, chunk_overlap, top_k, .. } = self.config;
        if chunk_size == 0 {
            return Err(IngestionError::ConfigError("chunk_size must be at least 1".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(IngestionError::ConfigError(format!(
                "chunk_overlap ({chunk_overlap}) must be smaller than chunk_size ({chunk_size})"
            )));
        }
        if top_k == 0 {
            return Err(IngestionError::ConfigError("top_k must be at least 1".to_string()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_assistant_settings() {
        let config = RagConfig::default();
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.chunk_overlap, 0);
        assert_eq!(config.top_k, 4);
        assert_eq!(config.similarity_threshold, None);
    }

    #[test]
    fn threshold_is_opt_in() {
        let config = RagConfig::builder().similarity_threshold(0.25).build().unwrap();
        assert_eq!(config.similarity_threshold, Some(0.25));
    }

    #[test]
    fn rejects_overlap_not_smaller_than_chunk_size() {
        let err = RagConfig::builder().chunk_size(10).chunk_overlap(10).build().unwrap_err();
        assert!(matches!(err, IngestionError::ConfigError(_)));
    }

    #[test]
    fn rejects_zero_chunk_size_and_top_k() {
        assert!(RagConfig::builder().chunk_size(0).build().is_err());
        assert!(RagConfig::builder().top_k(0).build().is_err());
    }
}
