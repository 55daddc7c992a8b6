//! Language-model trait used for question condensing and answer synthesis.

use async_trait::async_trait;

use crate::error::Result;

/// A text-completion model.
///
/// Implementations send one prompt and return the generated text. Failures
/// are reported as [`AssistantError::Synthesis`](crate::AssistantError::Synthesis);
/// no retries are attempted.
#[async_trait]
pub trait Llm: Send + Sync {
    /// Model identifier, used in logs.
    fn name(&self) -> &str;

    /// Complete `prompt` and return the generated text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
