//! Session chat transcript: an append-only log of user questions and AI
//! answers, scoped to one browser session and never persisted.

use serde::{Deserialize, Serialize};

/// Fixed context paragraph for general legal chat.
///
/// Chat QA always runs against this paragraph, never against an uploaded
/// document — document-grounded answers go through the analysis form.
pub const DEFAULT_LEGAL_CONTEXT: &str = "In most legal systems, a contract is an agreement between parties that is legally binding. \
     A verbal contract can be legally binding, but it may be harder to prove in court compared to a written agreement. \
     Certain types of agreements, such as real estate transactions, may require a written contract under the Statute of Frauds.";

/// Canned reply when chat QA fails for any reason.
pub const FALLBACK_ANSWER: &str = "Sorry, I couldn't generate a reliable answer right now.";

/// Who produced a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Ai,
}

impl Speaker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Ai => "ai",
        }
    }
}

/// One chat turn: who spoke and what they said.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub speaker: Speaker,
    pub text: String,
}

/// Append-only ordered log of chat messages for one session.
///
/// Insertion order is display order. Messages are never edited, pruned, or
/// written to durable storage; the transcript dies with the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user question.
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage {
            speaker: Speaker::User,
            text: text.into(),
        });
    }

    /// Append an AI answer.
    pub fn push_ai(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage {
            speaker: Speaker::Ai,
            text: text.into(),
        });
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let t = Transcript::new();
        assert!(t.is_empty());
        assert_eq!(t.len(), 0);
    }

    #[test]
    fn appends_in_order() {
        let mut t = Transcript::new();
        t.push_user("Is a verbal agreement legally binding?");
        t.push_ai("legally binding");
        t.push_user("What about real estate?");

        let speakers: Vec<Speaker> = t.messages().iter().map(|m| m.speaker).collect();
        assert_eq!(speakers, vec![Speaker::User, Speaker::Ai, Speaker::User]);
        assert_eq!(t.messages()[1].text, "legally binding");
    }

    #[test]
    fn speaker_labels() {
        assert_eq!(Speaker::User.as_str(), "user");
        assert_eq!(Speaker::Ai.as_str(), "ai");
    }

    #[test]
    fn default_context_mentions_verbal_contracts() {
        // The canned chat context must be able to answer the canonical
        // "is a verbal agreement binding" question extractively.
        assert!(DEFAULT_LEGAL_CONTEXT.contains("verbal contract"));
        assert!(DEFAULT_LEGAL_CONTEXT.contains("legally binding"));
    }
}
