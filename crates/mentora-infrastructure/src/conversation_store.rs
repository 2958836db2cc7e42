//! Directory-backed conversation store.
//!
//! Sessions are one JSON file each; a session's messages live in a sibling
//! JSON log file. Appends rewrite the log, which is fine at conversation
//! scale and keeps the files human-inspectable.

use crate::paths::MentoraPaths;
use async_trait::async_trait;
use mentora_core::{
    ChatMessage, ConversationSession, ConversationStore, LanguageLabel, MentoraError, Result,
};
use std::path::Path;
use tokio::fs;

/// JSON-file implementation of [`ConversationStore`].
pub struct DirConversationStore {
    paths: MentoraPaths,
}

impl DirConversationStore {
    /// Creates a store rooted at the default location (`~/.mentora`).
    pub async fn default_location() -> Result<Self> {
        Self::new(MentoraPaths::default_location()?).await
    }

    /// Creates a store rooted at the given paths, creating the directory
    /// structure if needed.
    pub async fn new(paths: MentoraPaths) -> Result<Self> {
        fs::create_dir_all(paths.sessions_dir())
            .await
            .map_err(|e| MentoraError::io(format!("failed to create sessions directory: {e}")))?;
        fs::create_dir_all(paths.messages_dir())
            .await
            .map_err(|e| MentoraError::io(format!("failed to create messages directory: {e}")))?;
        Ok(Self { paths })
    }

    async fn load_messages(&self, session_id: &str) -> Result<Vec<ChatMessage>> {
        let path = self.paths.messages_file(session_id);
        match fs::read_to_string(&path).await {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(MentoraError::io(format!(
                "failed to read message log {:?}: {err}",
                path
            ))),
        }
    }

    async fn write_json(path: &Path, json: String) -> Result<()> {
        fs::write(path, json)
            .await
            .map_err(|e| MentoraError::io(format!("failed to write {:?}: {e}", path)))
    }

    async fn remove_if_exists(path: &Path) -> Result<()> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(MentoraError::io(format!(
                "failed to delete {:?}: {err}",
                path
            ))),
        }
    }
}

/// Session ids become file names; anything that could escape the storage
/// directory is rejected up front.
fn validate_id(session_id: &str) -> Result<()> {
    if session_id.is_empty()
        || session_id.contains(['/', '\\'])
        || session_id.contains("..")
    {
        return Err(MentoraError::validation(format!(
            "invalid session id: {session_id:?}"
        )));
    }
    Ok(())
}

#[async_trait]
impl ConversationStore for DirConversationStore {
    async fn find_session(&self, session_id: &str) -> Result<Option<ConversationSession>> {
        validate_id(session_id)?;
        let path = self.paths.session_file(session_id);
        match fs::read_to_string(&path).await {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(MentoraError::io(format!(
                "failed to read session file {:?}: {err}",
                path
            ))),
        }
    }

    async fn save_session(&self, session: &ConversationSession) -> Result<()> {
        validate_id(&session.id)?;
        let json = serde_json::to_string_pretty(session)?;
        Self::write_json(&self.paths.session_file(&session.id), json).await
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        validate_id(session_id)?;
        Self::remove_if_exists(&self.paths.session_file(session_id)).await?;
        // Cascade: the message log goes with the session.
        Self::remove_if_exists(&self.paths.messages_file(session_id)).await
    }

    async fn list_sessions(&self) -> Result<Vec<ConversationSession>> {
        let mut sessions = Vec::new();
        let mut entries = fs::read_dir(self.paths.sessions_dir())
            .await
            .map_err(|e| MentoraError::io(format!("failed to read sessions directory: {e}")))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| MentoraError::io(format!("failed to read directory entry: {e}")))?
        {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            match fs::read_to_string(&path).await {
                Ok(json) => match serde_json::from_str::<ConversationSession>(&json) {
                    Ok(session) => sessions.push(session),
                    Err(err) => {
                        tracing::warn!(?path, error = %err, "skipping unparseable session file");
                    }
                },
                Err(err) => {
                    tracing::warn!(?path, error = %err, "skipping unreadable session file");
                }
            }
        }

        // Most recent first.
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }

    async fn append_message(&self, message: &ChatMessage) -> Result<()> {
        validate_id(&message.session_id)?;
        let mut messages = self.load_messages(&message.session_id).await?;
        messages.push(message.clone());
        let json = serde_json::to_string_pretty(&messages)?;
        Self::write_json(&self.paths.messages_file(&message.session_id), json).await
    }

    async fn messages(&self, session_id: &str) -> Result<Vec<ChatMessage>> {
        validate_id(session_id)?;
        let mut messages = self.load_messages(session_id).await?;
        // Stable sort: equal timestamps keep append order.
        messages.sort_by_key(|m| m.timestamp);
        Ok(messages)
    }

    async fn set_preferred_language(
        &self,
        session_id: &str,
        language: &LanguageLabel,
    ) -> Result<()> {
        let mut session = self
            .find_session(session_id)
            .await?
            .ok_or_else(|| MentoraError::not_found("session", session_id))?;
        session.preferred_language = language.clone();
        self.save_session(&session).await
    }
}
