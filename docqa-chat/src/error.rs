//! Error types for the `docqa-chat` crate.

use docqa_rag::IngestionError;
use thiserror::Error;

/// Errors surfaced to the user by the assistant.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// A required setting (usually the API key) is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Building the document index failed.
    #[error(transparent)]
    Ingestion(#[from] IngestionError),

    /// Producing an answer from the retrieved context failed.
    #[error("Synthesis error ({provider}): {message}")]
    Synthesis {
        /// The language-model provider (or retrieval step) that failed.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The canned-reply table could not be built.
    #[error("Fallback table error: {0}")]
    FallbackTable(String),
}

impl AssistantError {
    /// Stable name of the error kind, as shown to API clients.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "ConfigurationError",
            Self::Ingestion(_) => "IngestionError",
            Self::Synthesis { .. } => "SynthesisError",
            Self::FallbackTable(_) => "ConfigurationError",
        }
    }
}

/// A convenience result type for assistant operations.
pub type Result<T> = std::result::Result<T, AssistantError>;
