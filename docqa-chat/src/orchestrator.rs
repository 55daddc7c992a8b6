//! Decides how each question is answered.
//!
//! 1. A canned reply from the [`FallbackResponder`] short-circuits everything.
//! 2. Without a retrieval backend the caller is told to process documents.
//! 3. Otherwise the backend answers from the documents.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::fallback::FallbackResponder;
use crate::retrieval::RetrievalBackend;
use crate::session::ChatTurn;

/// Reply given when a question needs the documents but none were processed.
pub const NOT_READY_MESSAGE: &str = "Please process the documents before asking questions.";

/// Which path produced an [`Answer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOrigin {
    Fallback,
    NotReady,
    Retrieval,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub text: String,
    pub origin: AnswerOrigin,
    /// Documents that backed a retrieval answer; empty otherwise.
    pub sources: Vec<String>,
}

impl Answer {
    fn canned(text: impl Into<String>, origin: AnswerOrigin) -> Self {
        Self { text: text.into(), origin, sources: Vec::new() }
    }
}

/// Routes a question to a canned reply or to the retrieval backend.
pub struct AnswerOrchestrator {
    fallback: Arc<FallbackResponder>,
    backend: Option<Arc<dyn RetrievalBackend>>,
}

impl AnswerOrchestrator {
    /// An orchestrator with no retrieval backend.
    pub fn new(fallback: Arc<FallbackResponder>) -> Self {
        Self { fallback, backend: None }
    }

    /// Attach the backend built by a successful ingestion run.
    pub fn with_backend(mut self, backend: Arc<dyn RetrievalBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn is_ready(&self) -> bool {
        self.backend.is_some()
    }

    /// Answer `question`. `history` is read, never modified; recording the turn
    /// is the caller's job.
    ///
    /// # Errors
    ///
    /// Propagates the backend's [`AssistantError::Synthesis`](crate::AssistantError::Synthesis)
    /// unchanged. Canned and not-ready answers never fail.
    pub async fn answer(&self, question: &str, history: &[ChatTurn]) -> Result<Answer> {
        if let Some(reply) = self.fallback.lookup(question) {
            debug!("answered from fallback table");
            return Ok(Answer::canned(reply, AnswerOrigin::Fallback));
        }

        let Some(backend) = &self.backend else {
            debug!("no document index; asking user to process documents");
            return Ok(Answer::canned(NOT_READY_MESSAGE, AnswerOrigin::NotReady));
        };

        let grounded = backend.answer(question, history).await?;
        Ok(Answer {
            text: grounded.text,
            origin: AnswerOrigin::Retrieval,
            sources: grounded.sources,
        })
    }
}
