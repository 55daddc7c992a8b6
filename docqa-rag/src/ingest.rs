//! Whole-folder ingestion.
//!
//! [`ingest_folder`] is the single entry point the assistant uses at start-up:
//! it loads every matching file, chunks and embeds the text, and returns an
//! [`IngestedIndex`] that owns the freshly built in-memory store. A new run
//! always builds a new store; nothing is updated incrementally.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};

use crate::chunking::FixedSizeChunker;
use crate::config::RagConfig;
use crate::document::SearchResult;
use crate::embedding::EmbeddingProvider;
use crate::error::{IngestionError, Result};
use crate::inmemory::InMemoryVectorStore;
use crate::loader::{FileType, load_folder};
use crate::pipeline::RagPipeline;

/// Collection name used for the single per-run index.
pub const DOCUMENTS_COLLECTION: &str = "documents";

/// Summary of one ingestion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestionReport {
    pub folder: PathBuf,
    pub file_type: FileType,
    pub document_count: usize,
    pub chunk_count: usize,
    pub document_ids: Vec<String>,
}

/// The searchable result of one ingestion run.
pub struct IngestedIndex {
    pipeline: RagPipeline,
    report: IngestionReport,
}

impl IngestedIndex {
    /// What this index was built from.
    pub fn report(&self) -> &IngestionReport {
        &self.report
    }

    /// Configuration the index was built and is queried with.
    pub fn config(&self) -> &RagConfig {
        self.pipeline.config()
    }

    /// Retrieve the chunks most similar to `query`, best first.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<SearchResult>> {
        self.pipeline.query(DOCUMENTS_COLLECTION, query).await
    }
}

impl std::fmt::Debug for IngestedIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestedIndex").field("report", &self.report).finish_non_exhaustive()
    }
}

/// Load, chunk, embed and index every `file_type` file directly inside `folder`.
///
/// # Errors
///
/// Fails without producing an index when the folder is missing, holds no
/// matching file, a file cannot be parsed, no text was extracted at all, or the
/// embedding provider fails. Any single failure aborts the whole run.
pub async fn ingest_folder(
    folder: impl AsRef<Path>,
    file_type: FileType,
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
) -> Result<IngestedIndex> {
    let folder = folder.as_ref();
    info!(folder = %folder.display(), %file_type, "processing documents");

    let documents = load_folder(folder, file_type)?;
    if documents.iter().all(|d| d.text.is_empty()) {
        error!(folder = %folder.display(), "documents contain no text");
        return Err(IngestionError::EmptyCorpus(folder.to_path_buf()));
    }

    let chunker = FixedSizeChunker::new(config.chunk_size, config.chunk_overlap);
    let pipeline = RagPipeline::builder()
        .config(config)
        .embedding_provider(embedding_provider)
        .vector_store(Arc::new(InMemoryVectorStore::new()))
        .chunker(Arc::new(chunker))
        .build()?;

    pipeline.create_collection(DOCUMENTS_COLLECTION).await?;
    let chunks = pipeline.ingest_batch(DOCUMENTS_COLLECTION, &documents).await?;

    let report = IngestionReport {
        folder: folder.to_path_buf(),
        file_type,
        document_count: documents.len(),
        chunk_count: chunks.len(),
        document_ids: documents.into_iter().map(|d| d.id).collect(),
    };
    info!(
        folder = %folder.display(),
        documents = report.document_count,
        chunks = report.chunk_count,
        "document index ready"
    );

    Ok(IngestedIndex { pipeline, report })
}
