//! Session domain model.

use crate::language::LanguageLabel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A conversation session owned by one principal.
///
/// Sessions are created on first chat interaction or explicitly by the
/// owner; afterwards only `preferred_language` is ever mutated (updated each
/// turn from fresh detection). Deleting a session cascades to its messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSession {
    /// Opaque unique session identifier (UUID format)
    pub id: String,
    /// The owning principal (user name or account id)
    pub owner: String,
    /// Preferred / last-detected language for this session
    pub preferred_language: LanguageLabel,
    /// Timestamp when the session was created
    pub created_at: DateTime<Utc>,
}

impl ConversationSession {
    /// Creates a session with a fresh UUID and the working-language default.
    pub fn new(owner: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), owner)
    }

    /// Creates a session with a caller-supplied identifier.
    ///
    /// Used when a wire client names the session it wants to talk in before
    /// the store has seen it.
    pub fn with_id(id: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            owner: owner.into(),
            preferred_language: LanguageLabel::English,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sessions_default_to_the_working_language() {
        let session = ConversationSession::new("student");
        assert_eq!(session.owner, "student");
        assert!(session.preferred_language.is_english());
        assert!(!session.id.is_empty());
    }
}
