//! Per-session chat history.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// One question and the answer that was given to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatTurn {
    pub question: String,
    pub answer: String,
    pub asked_at: DateTime<Utc>,
}

impl ChatTurn {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self { question: question.into(), answer: answer.into(), asked_at: Utc::now() }
    }
}

/// Ordered chat history for a single user session.
///
/// Turns are only ever appended; [`clear`](ChatSession::clear) is the one way
/// to remove them.
#[derive(Debug, Clone)]
pub struct ChatSession {
    id: String,
    turns: Vec<ChatTurn>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self { id: Uuid::new_v4().to_string(), turns: Vec::new() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Append a turn and return its 1-based number.
    pub fn append_turn(&mut self, turn: ChatTurn) -> usize {
        self.turns.push(turn);
        self.turns.len()
    }

    /// Drop every turn. Clearing an empty history is a no-op.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Turns in the order they were asked.
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Turns newest first, each paired with its 1-based number.
    pub fn recent_first(&self) -> impl Iterator<Item = (usize, &ChatTurn)> {
        self.turns.iter().enumerate().rev().map(|(i, turn)| (i + 1, turn))
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
