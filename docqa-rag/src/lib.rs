//! Document ingestion and retrieval for the docqa assistant.
//!
//! This crate turns a folder of `.txt`, `.pdf` or `.docx` files into an
//! in-memory similarity index:
//!
//! - [`loader`] discovers files and extracts their text
//! - [`chunking`] cuts text into fixed-size, positional chunks
//! - [`embedding`] and [`openai`] produce vectors for chunks and queries
//! - [`inmemory`] stores vectors and answers cosine-similarity searches
//! - [`pipeline`] and [`ingest`] tie the steps together
//!
//! # Features
//!
//! - `openai` (default): [`OpenAIEmbeddingProvider`]
//! - `pdf` (default): PDF text extraction via `pdf-extract`
//! - `docx` (default): DOCX text extraction via `zip`

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod ingest;
pub mod inmemory;
pub mod loader;
#[cfg(feature = "openai")]
pub mod openai;
pub mod pipeline;
pub mod vectorstore;

pub use chunking::{Chunker, FixedSizeChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{IngestionError, Result};
pub use ingest::{DOCUMENTS_COLLECTION, IngestedIndex, IngestionReport, ingest_folder};
pub use inmemory::InMemoryVectorStore;
pub use loader::{FileType, discover_files, load_document, load_folder};
#[cfg(feature = "openai")]
pub use openai::OpenAIEmbeddingProvider;
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use vectorstore::VectorStore;
