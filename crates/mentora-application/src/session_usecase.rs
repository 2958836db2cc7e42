//! Session lifecycle use-cases over the conversation store.

use mentora_core::{ChatMessage, ConversationSession, ConversationStore, Result};
use std::sync::Arc;

/// Creates, lists and deletes sessions, and reconstructs their history.
///
/// Thin by design: the store is the source of truth, and nothing here caches
/// session state between calls.
pub struct SessionUsecase {
    store: Arc<dyn ConversationStore>,
}

impl SessionUsecase {
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self { store }
    }

    /// Creates and persists a new session for `owner`.
    pub async fn create_session(&self, owner: &str) -> Result<ConversationSession> {
        let session = ConversationSession::new(owner);
        self.store.save_session(&session).await?;
        Ok(session)
    }

    /// Returns the stored session, creating it when absent.
    pub async fn ensure_session(&self, session_id: &str, owner: &str) -> Result<ConversationSession> {
        if let Some(session) = self.store.find_session(session_id).await? {
            return Ok(session);
        }
        let session = ConversationSession::with_id(session_id, owner);
        self.store.save_session(&session).await?;
        Ok(session)
    }

    /// Lists all sessions, most recently created first.
    pub async fn list_sessions(&self) -> Result<Vec<ConversationSession>> {
        self.store.list_sessions().await
    }

    /// Deletes a session and, by cascade, its messages.
    pub async fn delete_session(&self, session_id: &str) -> Result<()> {
        self.store.delete_session(session_id).await
    }

    /// Returns the session's messages in chronological order.
    pub async fn history(&self, session_id: &str) -> Result<Vec<ChatMessage>> {
        self.store.messages(session_id).await
    }
}
