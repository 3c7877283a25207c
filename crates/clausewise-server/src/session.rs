//! In-memory session state.
//!
//! Each browser session gets a UUID carried in a hidden form field; its
//! chat transcript and optional custom logo live in a process-local map.
//! Nothing here is persisted — state dies with the process, and a session's
//! transcript only ever grows.

use std::collections::HashMap;
use std::sync::Arc;

use clausewise_core::Transcript;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Per-session state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub transcript: Transcript,
    /// Custom logo as a `data:` URI, set once via the logo upload.
    pub logo: Option<String>,
}

/// Process-local map of live sessions.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    /// Resolve a submitted session id, minting a fresh one when the field is
    /// missing or unparseable (first visit, or a restart invalidated it).
    pub async fn resolve(&self, submitted: Option<&str>) -> Uuid {
        let id = submitted
            .and_then(|s| Uuid::parse_str(s.trim()).ok())
            .unwrap_or_else(Uuid::new_v4);
        self.inner.write().await.entry(id).or_default();
        id
    }

    /// Snapshot a session for rendering.
    pub async fn view(&self, id: Uuid) -> Session {
        self.inner.read().await.get(&id).cloned().unwrap_or_default()
    }

    /// Append one completed chat turn: the user's question, then the answer.
    pub async fn push_chat_turn(&self, id: Uuid, question: &str, answer: &str) {
        let mut sessions = self.inner.write().await;
        let session = sessions.entry(id).or_default();
        session.transcript.push_user(question);
        session.transcript.push_ai(answer);
    }

    /// Set the cosmetic logo for a session.
    pub async fn set_logo(&self, id: Uuid, data_uri: String) {
        let mut sessions = self.inner.write().await;
        sessions.entry(id).or_default().logo = Some(data_uri);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clausewise_core::Speaker;

    #[tokio::test]
    async fn resolve_mints_and_reuses_ids() {
        let store = SessionStore::default();
        let id = store.resolve(None).await;
        assert_eq!(store.resolve(Some(&id.to_string())).await, id);
        assert_ne!(store.resolve(Some("not-a-uuid")).await, id);
    }

    #[tokio::test]
    async fn chat_turns_accumulate_in_order() {
        let store = SessionStore::default();
        let id = store.resolve(None).await;

        store.push_chat_turn(id, "first?", "one").await;
        store.push_chat_turn(id, "second?", "two").await;

        let session = store.view(id).await;
        let messages = session.transcript.messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].speaker, Speaker::User);
        assert_eq!(messages[1].speaker, Speaker::Ai);
        assert_eq!(messages[3].text, "two");
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = SessionStore::default();
        let a = store.resolve(None).await;
        let b = store.resolve(None).await;

        store.push_chat_turn(a, "q", "a").await;

        assert_eq!(store.view(a).await.transcript.len(), 2);
        assert!(store.view(b).await.transcript.is_empty());
    }
}
