//! Wire-contract DTOs for a single chat turn.
//!
//! These types are the JSON contract an embedding transport speaks:
//!
//! ```json
//! { "session_id": "...", "message": "...",
//!   "history": [ {"role": "user", "content": "..."}, ... ] }
//! ```
//!
//! and the response envelope with `translated_message` serialized as JSON
//! `null` exactly when the detected language is English.

use crate::language::LanguageLabel;
use serde::{Deserialize, Serialize};

/// One prior exchange entry as supplied by a wire client.
///
/// `role` is kept as a free string: `"user"` maps to a user segment in the
/// composed prompt and any other value (`"bot"`, `"assistant"`) to an
/// assistant segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
}

impl HistoryEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            role: "bot".to_string(),
            content: content.into(),
        }
    }

    /// Whether this entry maps to a user segment.
    pub fn is_user(&self) -> bool {
        self.role == "user"
    }
}

/// An inbound chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRequest {
    pub session_id: String,
    pub message: String,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl TurnRequest {
    pub fn new(session_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            message: message.into(),
            history: Vec::new(),
        }
    }
}

/// The response envelope for a completed turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResponse {
    pub session_id: String,
    /// Final answer text, in the user's detected language
    pub answer: String,
    /// Human-readable detected language label
    pub detected_language: String,
    /// The user's raw input
    pub original_message: String,
    /// Working-language form of the input; `null` iff the detected
    /// language is English
    pub translated_message: Option<String>,
}

impl TurnResponse {
    /// Builds the envelope, enforcing the `translated_message`-null-iff-
    /// English rule in one place.
    pub fn new(
        session_id: impl Into<String>,
        answer: impl Into<String>,
        detected_language: &LanguageLabel,
        original_message: impl Into<String>,
        normalized_message: String,
    ) -> Self {
        let translated_message = if detected_language.is_english() {
            None
        } else {
            Some(normalized_message)
        };
        Self {
            session_id: session_id.into(),
            answer: answer.into(),
            detected_language: detected_language.to_string(),
            original_message: original_message.into(),
            translated_message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_deserializes_from_the_wire_shape() {
        let body = json!({
            "session_id": "abc",
            "message": "hi",
            "history": [
                {"role": "user", "content": "hello"},
                {"role": "bot", "content": "hi there"}
            ]
        });
        let request: TurnRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.session_id, "abc");
        assert_eq!(request.history.len(), 2);
        assert!(request.history[0].is_user());
        assert!(!request.history[1].is_user());
    }

    #[test]
    fn history_defaults_to_empty() {
        let request: TurnRequest =
            serde_json::from_value(json!({"session_id": "abc", "message": "hi"})).unwrap();
        assert!(request.history.is_empty());
    }

    #[test]
    fn translated_message_is_null_for_english() {
        let response = TurnResponse::new(
            "abc",
            "hello!",
            &LanguageLabel::English,
            "hi",
            "hi".to_string(),
        );
        let value = serde_json::to_value(&response).unwrap();
        assert!(value["translated_message"].is_null());
    }

    #[test]
    fn translated_message_is_present_for_other_languages() {
        let response = TurnResponse::new(
            "abc",
            "سلام!",
            &LanguageLabel::Named("Persian".to_string()),
            "سلام",
            "Hello".to_string(),
        );
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["translated_message"], "Hello");
        assert_eq!(value["detected_language"], "Persian");
    }
}
