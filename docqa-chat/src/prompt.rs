//! Prompt templates for conversational retrieval.

use crate::session::ChatTurn;

const CONDENSE_INSTRUCTION: &str = "Given the following conversation and a follow up question, rephrase the follow up question to be a standalone question, in its original language.";

const QA_INSTRUCTION: &str = "Use the following pieces of context to answer the question at the end. If you don't know the answer, just say that you don't know, don't try to make up an answer.";

/// Render prior turns as a `Human:` / `Assistant:` transcript.
///
/// Every turn starts on a new line, so the result begins with `\n` when there
/// is any history.
pub fn format_chat_history(history: &[ChatTurn]) -> String {
    history
        .iter()
        .map(|turn| format!("\nHuman: {}\nAssistant: {}", turn.question, turn.answer))
        .collect()
}

/// Prompt asking the model to rewrite a follow-up as a standalone question.
pub fn condense_question_prompt(history: &[ChatTurn], question: &str) -> String {
    let chat_history = format_chat_history(history);
    format!(
        "{CONDENSE_INSTRUCTION}\n\nChat History:\n{chat_history}\nFollow Up Input: {question}\nStandalone question:"
    )
}

/// Prompt asking the model to answer `question` from the given passages.
pub fn answer_prompt<'a>(passages: impl IntoIterator<Item = &'a str>, question: &str) -> String {
    let context = passages.into_iter().collect::<Vec<_>>().join("\n\n");
    format!("{QA_INSTRUCTION}\n\n{context}\n\nQuestion: {question}\nHelpful Answer:")
}
