//! Conversational retrieval over an ingested document index.

use std::sync::Arc;

use async_trait::async_trait;
use docqa_rag::IngestedIndex;
use tracing::{debug, error, info};

use crate::error::{AssistantError, Result};
use crate::llm::Llm;
use crate::prompt::{answer_prompt, condense_question_prompt};
use crate::session::ChatTurn;

/// An answer produced from retrieved document passages.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundedAnswer {
    pub text: String,
    /// Distinct ids of the documents whose chunks were placed in the prompt,
    /// in retrieval order.
    pub sources: Vec<String>,
}

/// Something that can answer a question from the ingested documents.
#[async_trait]
pub trait RetrievalBackend: Send + Sync {
    /// Answer `question` given the prior turns. `history` is never modified.
    async fn answer(&self, question: &str, history: &[ChatTurn]) -> Result<GroundedAnswer>;
}

/// Condense → retrieve → stuff → generate.
///
/// Owns the index it was built with, so the backend and the index always come
/// from the same ingestion run.
pub struct ConversationalRetrieval {
    index: IngestedIndex,
    llm: Arc<dyn Llm>,
}

impl ConversationalRetrieval {
    pub fn new(index: IngestedIndex, llm: Arc<dyn Llm>) -> Self {
        Self { index, llm }
    }

    pub fn index(&self) -> &IngestedIndex {
        &self.index
    }

    async fn standalone_question(&self, question: &str, history: &[ChatTurn]) -> Result<String> {
        if history.is_empty() {
            return Ok(question.to_string());
        }
        let prompt = condense_question_prompt(history, question);
        let condensed = self.llm.complete(&prompt).await?;
        let condensed = condensed.trim();
        debug!(original = question, condensed, "condensed follow-up question");
        // An empty rewrite would retrieve nothing useful; keep the user's wording.
        Ok(if condensed.is_empty() { question.to_string() } else { condensed.to_string() })
    }
}

#[async_trait]
impl RetrievalBackend for ConversationalRetrieval {
    async fn answer(&self, question: &str, history: &[ChatTurn]) -> Result<GroundedAnswer> {
        let standalone = self.standalone_question(question, history).await?;

        let results = self.index.retrieve(&standalone).await.map_err(|e| {
            error!(error = %e, "retrieval failed");
            AssistantError::Synthesis {
                provider: "retriever".into(),
                message: format!("failed to retrieve passages: {e}"),
            }
        })?;

        let mut sources: Vec<String> = Vec::new();
        for result in &results {
            if !sources.contains(&result.chunk.document_id) {
                sources.push(result.chunk.document_id.clone());
            }
        }

        let prompt = answer_prompt(results.iter().map(|r| r.chunk.text.as_str()), &standalone);
        let text = self.llm.complete(&prompt).await?.trim().to_string();

        info!(model = self.llm.name(), passages = results.len(), "answered from documents");
        Ok(GroundedAnswer { text, sources })
    }
}
