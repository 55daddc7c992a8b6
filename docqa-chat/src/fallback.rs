//! Canned replies for greetings and small talk.
//!
//! The table is declared in `data/fallback_responses.json` as an ordered list
//! of `{ "phrase", "reply" }` entries and compiled into the binary. Phrases are
//! normalized while the table is built. When two entries normalize to the same
//! phrase, the later entry wins.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::debug;

use crate::error::{AssistantError, Result};

const BUILTIN_TABLE: &str = include_str!("../data/fallback_responses.json");

#[derive(Debug, Deserialize)]
struct FallbackTable {
    entries: Vec<FallbackEntry>,
}

#[derive(Debug, Deserialize)]
struct FallbackEntry {
    phrase: String,
    reply: String,
}

/// Trim surrounding whitespace and lowercase.
///
/// Punctuation is kept, so `"Where are you from?"` and `"where are you from"`
/// stay distinct.
pub fn normalize(question: &str) -> String {
    question.trim().to_lowercase()
}

/// Exact-match lookup of canned replies.
#[derive(Debug, Clone)]
pub struct FallbackResponder {
    replies: HashMap<String, String>,
}

impl FallbackResponder {
    /// The responder built from the table shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_TABLE)
    }

    /// Build a responder from a JSON table (`{"entries": [{"phrase", "reply"}, ...]}`).
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::FallbackTable`] for malformed JSON or for an
    /// entry whose phrase or reply is blank.
    pub fn from_json(json: &str) -> Result<Self> {
        let table: FallbackTable = serde_json::from_str(json)
            .map_err(|e| AssistantError::FallbackTable(format!("invalid table: {e}")))?;
        Self::from_entries(table.entries.into_iter().map(|e| (e.phrase, e.reply)))
    }

    /// Build a responder from `(phrase, reply)` pairs, later pairs overriding
    /// earlier ones with the same normalized phrase.
    pub fn from_entries<I, P, R>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (P, R)>,
        P: AsRef<str>,
        R: Into<String>,
    {
        let mut replies = HashMap::new();
        for (position, (phrase, reply)) in entries.into_iter().enumerate() {
            let key = normalize(phrase.as_ref());
            let reply = reply.into();
            if key.is_empty() {
                return Err(AssistantError::FallbackTable(format!(
                    "entry {position} has an empty phrase"
                )));
            }
            if reply.trim().is_empty() {
                return Err(AssistantError::FallbackTable(format!(
                    "entry {position} ('{key}') has an empty reply"
                )));
            }
            if replies.insert(key.clone(), reply).is_some() {
                debug!(phrase = %key, position, "fallback phrase redefined, later reply kept");
            }
        }
        Ok(Self { replies })
    }

    /// The canned reply for `question`, if its normalized form is in the table.
    pub fn lookup(&self, question: &str) -> Option<&str> {
        self.replies.get(&normalize(question)).map(String::as_str)
    }

    /// Number of distinct phrases.
    pub fn len(&self) -> usize {
        self.replies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_loads_and_deduplicates() {
        let responder = FallbackResponder::builtin().unwrap();
        // 144 entries in the data file, "tell me a joke" declared twice.
        assert_eq!(responder.len(), 143);
    }

    #[test]
    fn greeting_matches_after_normalization() {
        let responder = FallbackResponder::builtin().unwrap();
        assert_eq!(responder.lookup("  HI \n"), Some("Hello! How can I assist you today?"));
    }

    #[test]
    fn duplicate_phrase_keeps_the_later_reply() {
        let responder = FallbackResponder::builtin().unwrap();
        assert_eq!(
            responder.lookup("Tell me a joke"),
            Some("Sure! Why don't scientists trust atoms? Because they make up everything!")
        );
    }

    #[test]
    fn replies_are_served_exactly_as_written() {
        let responder = FallbackResponder::builtin().unwrap();
        assert_eq!(
            responder.lookup("do you like art?"),
            Some("Art is fascinating! I can help you find")
        );
        assert_eq!(
            responder.lookup("do you like art"),
            Some("I don't create art, but I can help you find information on artists!")
        );
    }

    #[test]
    fn punctuation_variants_are_separate_phrases() {
        let responder = FallbackResponder::builtin().unwrap();
        assert_eq!(
            responder.lookup("where are you from"),
            Some("I exist in the cloud, ready to assist you from anywhere.")
        );
        assert_eq!(
            responder.lookup("Where are you from?"),
            Some("I exist in the cloud, accessible from anywhere!")
        );
    }

    #[test]
    fn unknown_question_is_not_found() {
        let responder = FallbackResponder::builtin().unwrap();
        assert_eq!(responder.lookup("What does the document say?"), None);
        assert_eq!(responder.lookup("hi!"), None);
        assert_eq!(responder.lookup(""), None);
    }

    #[test]
    fn blank_entries_are_rejected() {
        assert!(matches!(
            FallbackResponder::from_entries([("  ", "reply")]),
            Err(AssistantError::FallbackTable(_))
        ));
        assert!(matches!(
            FallbackResponder::from_entries([("hi", " ")]),
            Err(AssistantError::FallbackTable(_))
        ));
        assert!(FallbackResponder::from_json("{\"entries\": 3}").is_err());
    }

    #[test]
    fn later_entry_wins_on_normalized_collision() {
        let responder =
            FallbackResponder::from_entries([("Hi", "first"), (" hi ", "second")]).unwrap();
        assert_eq!(responder.len(), 1);
        assert_eq!(responder.lookup("hi"), Some("second"));
    }
}
