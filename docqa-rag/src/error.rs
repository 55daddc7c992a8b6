//! Error types for the `docqa-rag` crate.

use std::path::PathBuf;

use thiserror::Error;

use crate::loader::FileType;

/// Errors that can occur while building or querying a document index.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// The configured document folder does not exist or is not a directory.
    #[error("Document folder not found: {}", .0.display())]
    FolderNotFound(PathBuf),

    /// The folder exists but holds no file of the configured type.
    #[error("No {file_type} files found in the '{}' folder", .folder.display())]
    NoMatchingFiles {
        /// The folder that was scanned.
        folder: PathBuf,
        /// The file type that was requested.
        file_type: FileType,
    },

    /// Every matching file was read but none contained any text.
    #[error("No text could be extracted from the documents in '{}'", .0.display())]
    EmptyCorpus(PathBuf),

    /// A file could not be read or parsed.
    #[error("Failed to load '{}': {message}", .path.display())]
    LoaderError {
        /// The offending file.
        path: PathBuf,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An error in the ingest or query orchestration.
    #[error("Pipeline error: {0}")]
    PipelineError(String),

    /// Filesystem error while scanning the document folder.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience result type for ingestion and retrieval operations.
pub type Result<T> = std::result::Result<T, IngestionError>;
