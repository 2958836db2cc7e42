//! Error types for the Mentora workspace.

use thiserror::Error;

/// A shared error type for the entire workspace.
///
/// Pipeline-stage failures (validation, detection, translation, grounding,
/// completion, persistence) get dedicated variants so the orchestrator's
/// per-stage recovery policy can match on them instead of string-typing.
#[derive(Error, Debug, Clone)]
pub enum MentoraError {
    /// The turn was rejected before any external call was made.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Language classification failed. Recovered locally as `Unknown`.
    #[error("Language detection failed: {0}")]
    Detection(String),

    /// A translation call failed. Recovered locally as the untranslated text.
    #[error("Translation failed: {0}")]
    Translation(String),

    /// The grounding engine call failed. Recovered locally as empty context.
    #[error("Grounding failed: {0}")]
    Grounding(String),

    /// The generative completion call failed. Fatal for the turn.
    #[error("Completion failed: {0}")]
    Completion(String),

    /// The conversation store failed. Must not prevent responding.
    #[error("Persistence failed: {0}")]
    Persistence(String),

    /// Entity not found with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MentoraError {
    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Detection error
    pub fn detection(message: impl Into<String>) -> Self {
        Self::Detection(message.into())
    }

    /// Creates a Translation error
    pub fn translation(message: impl Into<String>) -> Self {
        Self::Translation(message.into())
    }

    /// Creates a Grounding error
    pub fn grounding(message: impl Into<String>) -> Self {
        Self::Grounding(message.into())
    }

    /// Creates a Completion error
    pub fn completion(message: impl Into<String>) -> Self {
        Self::Completion(message.into())
    }

    /// Creates a Persistence error
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a Completion error
    pub fn is_completion(&self) -> bool {
        matches!(self, Self::Completion(_))
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error is recoverable inside the pipeline.
    ///
    /// Detection, translation and grounding failures degrade the turn but
    /// never abort it; everything else propagates to the stage policy.
    pub fn is_fail_open(&self) -> bool {
        matches!(
            self,
            Self::Detection(_) | Self::Translation(_) | Self::Grounding(_)
        )
    }
}

impl From<std::io::Error> for MentoraError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for MentoraError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for MentoraError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, MentoraError>`.
pub type Result<T> = std::result::Result<T, MentoraError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fail_open_covers_exactly_the_recoverable_stages() {
        assert!(MentoraError::detection("x").is_fail_open());
        assert!(MentoraError::translation("x").is_fail_open());
        assert!(MentoraError::grounding("x").is_fail_open());

        assert!(!MentoraError::validation("x").is_fail_open());
        assert!(!MentoraError::completion("x").is_fail_open());
        assert!(!MentoraError::persistence("x").is_fail_open());
    }

    #[test]
    fn io_conversion_keeps_the_kind() {
        let err: MentoraError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert!(err.to_string().contains("NotFound"));
    }
}
