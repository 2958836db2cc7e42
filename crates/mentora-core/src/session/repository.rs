//! Conversation store trait.
//!
//! Defines the interface for durable session and message persistence. The
//! store is the only shared mutable resource in the pipeline: appends are
//! per-message, the session's preferred language is the single mutable
//! field, and no multi-record transactions are required.

use super::message::ChatMessage;
use super::model::ConversationSession;
use crate::error::Result;
use crate::language::LanguageLabel;
use async_trait::async_trait;

/// An abstract repository for sessions and their ordered message logs.
///
/// Implementations should return history sorted by timestamp ascending with
/// a stable tiebreak (insertion order), and must cascade message deletion
/// when a session is deleted.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Finds a session by its ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(session))`: session found
    /// - `Ok(None)`: session not found
    /// - `Err(_)`: storage failure
    async fn find_session(&self, session_id: &str) -> Result<Option<ConversationSession>>;

    /// Saves (creates or overwrites) a session.
    async fn save_session(&self, session: &ConversationSession) -> Result<()>;

    /// Deletes a session and all of its messages.
    ///
    /// Deleting a session that does not exist is not an error.
    async fn delete_session(&self, session_id: &str) -> Result<()>;

    /// Lists all sessions, most recently created first.
    async fn list_sessions(&self) -> Result<Vec<ConversationSession>>;

    /// Appends one message to the session's log.
    async fn append_message(&self, message: &ChatMessage) -> Result<()>;

    /// Returns the session's messages ordered by timestamp ascending.
    ///
    /// An unknown session yields an empty history rather than an error.
    async fn messages(&self, session_id: &str) -> Result<Vec<ChatMessage>>;

    /// Updates the session's stored preferred language.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the session does not exist.
    async fn set_preferred_language(
        &self,
        session_id: &str,
        language: &LanguageLabel,
    ) -> Result<()>;
}
