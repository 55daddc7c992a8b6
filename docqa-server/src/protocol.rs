//! JSON bodies exchanged with the browser UI.

use chrono::{DateTime, Utc};
use docqa_chat::{AnswerOrigin, ChatTurn};
use serde::{Deserialize, Serialize};

/// Characters of the question shown in a history title.
const TITLE_PREVIEW_CHARS: usize = 50;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub origin: AnswerOrigin,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
    /// 1-based number of the turn this exchange was recorded as.
    pub turn: usize,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct HistoryEntry {
    pub number: usize,
    pub title: String,
    pub question: String,
    pub answer: String,
    pub asked_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(number: usize, turn: &ChatTurn) -> Self {
        Self {
            number,
            title: history_title(number, &turn.question),
            question: turn.question.clone(),
            answer: turn.answer.clone(),
            asked_at: turn.asked_at,
        }
    }
}

/// `Q{n}: {first 50 chars}...`, the title shown for a collapsed history item.
pub fn history_title(number: usize, question: &str) -> String {
    let preview: String = question.chars().take(TITLE_PREVIEW_CHARS).collect();
    format!("Q{number}: {preview}...")
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct HistoryResponse {
    /// Most recent first.
    pub turns: Vec<HistoryEntry>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ClearHistoryResponse {
    pub cleared: usize,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct StatusResponse {
    pub credentials_present: bool,
    pub documents_ready: bool,
    pub data_dir: String,
    pub file_type: String,
    pub document_count: usize,
    pub chunk_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingestion_error: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_truncates_long_questions_by_character() {
        let question = "é".repeat(60);
        let title = history_title(3, &question);
        assert_eq!(title, format!("Q3: {}...", "é".repeat(50)));
    }

    #[test]
    fn title_keeps_short_questions_whole() {
        assert_eq!(history_title(1, "hi"), "Q1: hi...");
    }
}
