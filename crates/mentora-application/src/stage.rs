//! Per-turn pipeline stages and their failure policies.
//!
//! Each stage carries an explicit policy instead of scattering try/catch
//! logic through the orchestrator: translation and grounding are quality
//! enhancements whose absence only degrades relevance, while completion is
//! the sole source of the answer's content and has no silent substitute.

use std::fmt;

/// The stages a turn moves through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStage {
    Received,
    LanguageDetected,
    Normalized,
    Grounded,
    Composed,
    Completed,
    Translated,
    Persisted,
    Responded,
}

/// What happens when a stage's underlying call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagePolicy {
    /// Recover locally with a degraded value and keep going.
    FailOpen,
    /// The turn cannot proceed normally past this stage.
    FailFatal,
}

impl TurnStage {
    /// The recovery policy for this stage.
    pub fn policy(&self) -> StagePolicy {
        match self {
            // Empty input is rejected before any external call.
            Self::Received => StagePolicy::FailFatal,
            // Detection failure maps to Unknown.
            Self::LanguageDetected => StagePolicy::FailOpen,
            // Translation failure keeps the untranslated text.
            Self::Normalized => StagePolicy::FailOpen,
            // Grounding failure degrades to empty context.
            Self::Grounded => StagePolicy::FailOpen,
            // Composition is pure; a failure here is a programming error.
            Self::Composed => StagePolicy::FailFatal,
            // No fallback text exists for a failed completion.
            Self::Completed => StagePolicy::FailFatal,
            // Back-translation failure keeps the working-language answer.
            Self::Translated => StagePolicy::FailOpen,
            // Store failure must not prevent returning the computed answer.
            Self::Persisted => StagePolicy::FailOpen,
            Self::Responded => StagePolicy::FailFatal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::LanguageDetected => "language_detected",
            Self::Normalized => "normalized",
            Self::Grounded => "grounded",
            Self::Composed => "composed",
            Self::Completed => "completed",
            Self::Translated => "translated",
            Self::Persisted => "persisted",
            Self::Responded => "responded",
        }
    }
}

impl fmt::Display for TurnStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
