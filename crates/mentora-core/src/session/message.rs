//! Persisted chat message types.

use crate::language::LanguageLabel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a message. Closed set: the user or the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// The wire-level role string (`"user"` / `"bot"`).
    pub fn as_role(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

/// One persisted message within a session.
///
/// A user message and its bot reply are two distinct records. `text` is what
/// the user saw (their own language); `original_text` is the pre-translation
/// form and `translated_text` the post-translation form when a translation
/// step ran. Messages are ordered by `timestamp` within a session and that
/// order is the canonical conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The session this message belongs to
    pub session_id: String,
    /// Message author
    pub sender: Sender,
    /// The text shown to the user
    pub text: String,
    /// Detected language of the turn this message belongs to
    pub detected_language: LanguageLabel,
    /// Pre-translation text
    pub original_text: String,
    /// Post-translation text, when a translation step ran
    pub translated_text: Option<String>,
    /// Whether a translation step ran for this message
    pub is_translated: bool,
    /// Creation time; immutable, strictly ordered within a session
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Builds the record for a user's turn.
    ///
    /// `normalized` is the working-language form of the input, present only
    /// when the detected language required translation.
    pub fn user_turn(
        session_id: impl Into<String>,
        raw_text: impl Into<String>,
        detected_language: LanguageLabel,
        normalized: Option<String>,
    ) -> Self {
        let raw_text = raw_text.into();
        let is_translated = normalized.is_some();
        Self {
            session_id: session_id.into(),
            sender: Sender::User,
            text: raw_text.clone(),
            detected_language,
            original_text: raw_text,
            translated_text: normalized,
            is_translated,
            timestamp: Utc::now(),
        }
    }

    /// Builds the record for the bot's reply.
    ///
    /// `shown_text` is the (possibly back-translated) answer the user saw;
    /// `completion_text` is the untranslated model output.
    pub fn bot_turn(
        session_id: impl Into<String>,
        shown_text: impl Into<String>,
        completion_text: impl Into<String>,
        detected_language: LanguageLabel,
    ) -> Self {
        let shown_text = shown_text.into();
        let is_translated = !detected_language.is_english() && !detected_language.is_unknown();
        Self {
            session_id: session_id.into(),
            sender: Sender::Bot,
            translated_text: is_translated.then(|| shown_text.clone()),
            text: shown_text,
            detected_language,
            original_text: completion_text.into(),
            is_translated,
            timestamp: Utc::now(),
        }
    }

    /// The working-language form of this message, for prompt history.
    ///
    /// User messages contribute their normalized text when one exists (raw
    /// text was already English otherwise); bot messages contribute the
    /// untranslated completion.
    pub fn working_language_text(&self) -> &str {
        match self.sender {
            Sender::User => self.translated_text.as_deref().unwrap_or(&self.text),
            Sender::Bot => &self.original_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Sender::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Sender::Bot).unwrap(), "\"bot\"");
    }

    #[test]
    fn user_turn_keeps_raw_text_in_both_fields() {
        let msg = ChatMessage::user_turn(
            "s1",
            "سلام دنیا",
            LanguageLabel::Named("Persian".to_string()),
            Some("Hello world".to_string()),
        );
        assert_eq!(msg.text, "سلام دنیا");
        assert_eq!(msg.original_text, "سلام دنیا");
        assert_eq!(msg.translated_text.as_deref(), Some("Hello world"));
        assert!(msg.is_translated);
        assert_eq!(msg.working_language_text(), "Hello world");
    }

    #[test]
    fn english_user_turn_is_untranslated() {
        let msg = ChatMessage::user_turn("s1", "hello", LanguageLabel::English, None);
        assert!(!msg.is_translated);
        assert_eq!(msg.working_language_text(), "hello");
    }

    #[test]
    fn bot_turn_marks_translation_only_for_non_english() {
        let translated = ChatMessage::bot_turn(
            "s1",
            "سلام",
            "Hello",
            LanguageLabel::Named("Persian".to_string()),
        );
        assert!(translated.is_translated);
        assert_eq!(translated.working_language_text(), "Hello");

        let plain = ChatMessage::bot_turn("s1", "Hello", "Hello", LanguageLabel::English);
        assert!(!plain.is_translated);
        assert_eq!(plain.translated_text, None);
    }
}
