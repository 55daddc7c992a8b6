//! Question answering for the docqa assistant.
//!
//! - [`fallback`]: exact-match canned replies for small talk
//! - [`session`]: chat history owned by the UI session
//! - [`llm`] and [`openai`]: text-completion models
//! - [`retrieval`]: condense / retrieve / answer over an ingested index
//! - [`orchestrator`]: picks the path for each question

pub mod error;
pub mod fallback;
pub mod llm;
#[cfg(feature = "openai")]
pub mod openai;
pub mod orchestrator;
pub mod prompt;
pub mod retrieval;
pub mod session;

pub use error::{AssistantError, Result};
pub use fallback::{FallbackResponder, normalize};
pub use llm::Llm;
#[cfg(feature = "openai")]
pub use openai::OpenAICompletionClient;
pub use orchestrator::{Answer, AnswerOrchestrator, AnswerOrigin, NOT_READY_MESSAGE};
pub use retrieval::{ConversationalRetrieval, GroundedAnswer, RetrievalBackend};
pub use session::{ChatSession, ChatTurn};
