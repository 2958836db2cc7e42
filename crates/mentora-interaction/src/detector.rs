//! Language detection strategies.
//!
//! One contract, two implementations: [`ScriptDetector`] classifies locally
//! by dominant Unicode script (deterministic, no network call), while
//! [`GenerativeDetector`] asks the completion model (better accuracy on
//! Latin-script languages, at the cost of latency and determinism). Both
//! honor the same edge rules: empty input is `Unknown`, fragments shorter
//! than five characters default to `English` because statistical detection
//! is unreliable on them, and any classifier failure maps to `Unknown`.

use crate::completion::CompletionModel;
use crate::params::GenerationParams;
use crate::prompt::PromptComposer;
use async_trait::async_trait;
use mentora_core::LanguageLabel;
use std::sync::Arc;

/// Minimum trimmed length (in characters) before classification is trusted.
const SHORT_TEXT_THRESHOLD: usize = 5;

const DETECTION_INSTRUCTIONS: &str = "You are a language detection expert. Detect the language \
of the given text and respond with ONLY the language name in English (e.g., \"English\", \
\"Persian\", \"Arabic\", \"French\", \"Spanish\", \"German\", etc.). If the text contains \
multiple languages, identify the dominant language. Be very accurate in your detection.";

/// Classifies the dominant natural language of a text fragment.
#[async_trait]
pub trait LanguageDetector: Send + Sync {
    /// Detects the language of `text`. Never fails: classifier errors map
    /// to [`LanguageLabel::Unknown`].
    async fn detect(&self, text: &str) -> LanguageLabel;
}

/// Applies the edge rules shared by every strategy.
fn preclassify(text: &str) -> Option<LanguageLabel> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(LanguageLabel::Unknown);
    }
    if trimmed.chars().count() < SHORT_TEXT_THRESHOLD {
        return Some(LanguageLabel::English);
    }
    None
}

/// Local, deterministic detector keyed on the dominant Unicode script.
///
/// Latin-script text maps to English (the working language); scripts that
/// identify a language family map to that family's principal language, with
/// Perso-Arabic letters distinguishing Persian from Arabic.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptDetector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Script {
    Latin,
    Arabic,
    Cyrillic,
    Greek,
    Hebrew,
    Devanagari,
    Hangul,
    Kana,
    Han,
    Thai,
}

impl ScriptDetector {
    pub fn new() -> Self {
        Self
    }

    fn script_of(c: char) -> Option<Script> {
        match c {
            'a'..='z' | 'A'..='Z' | '\u{00C0}'..='\u{024F}' => Some(Script::Latin),
            '\u{0600}'..='\u{06FF}' | '\u{0750}'..='\u{077F}' => Some(Script::Arabic),
            '\u{0400}'..='\u{04FF}' => Some(Script::Cyrillic),
            '\u{0370}'..='\u{03FF}' => Some(Script::Greek),
            '\u{0590}'..='\u{05FF}' => Some(Script::Hebrew),
            '\u{0900}'..='\u{097F}' => Some(Script::Devanagari),
            '\u{AC00}'..='\u{D7AF}' | '\u{1100}'..='\u{11FF}' => Some(Script::Hangul),
            '\u{3040}'..='\u{30FF}' => Some(Script::Kana),
            '\u{4E00}'..='\u{9FFF}' => Some(Script::Han),
            '\u{0E00}'..='\u{0E7F}' => Some(Script::Thai),
            _ => None,
        }
    }

    /// Letters unique to the Persian extension of the Arabic script
    /// (pe, che, zhe, gaf).
    fn is_persian_marker(c: char) -> bool {
        matches!(c, '\u{067E}' | '\u{0686}' | '\u{0698}' | '\u{06AF}')
    }

    fn classify(text: &str) -> LanguageLabel {
        let mut counts: [(Script, usize); 10] = [
            (Script::Latin, 0),
            (Script::Arabic, 0),
            (Script::Cyrillic, 0),
            (Script::Greek, 0),
            (Script::Hebrew, 0),
            (Script::Devanagari, 0),
            (Script::Hangul, 0),
            (Script::Kana, 0),
            (Script::Han, 0),
            (Script::Thai, 0),
        ];
        let mut persian_markers = false;
        let mut total = 0usize;

        for c in text.chars() {
            if let Some(script) = Self::script_of(c) {
                total += 1;
                if script == Script::Arabic && Self::is_persian_marker(c) {
                    persian_markers = true;
                }
                for entry in counts.iter_mut() {
                    if entry.0 == script {
                        entry.1 += 1;
                    }
                }
            }
        }

        if total == 0 {
            return LanguageLabel::Unknown;
        }

        let mut dominant = Script::Latin;
        let mut best = 0;
        for (script, count) in counts {
            if count > best {
                best = count;
                dominant = script;
            }
        }

        // Kana anywhere means Japanese even when Han characters dominate.
        let kana = counts.iter().any(|(s, n)| *s == Script::Kana && *n > 0);

        match dominant {
            Script::Latin => LanguageLabel::English,
            Script::Arabic if persian_markers => LanguageLabel::Named("Persian".to_string()),
            Script::Arabic => LanguageLabel::Named("Arabic".to_string()),
            Script::Cyrillic => LanguageLabel::Named("Russian".to_string()),
            Script::Greek => LanguageLabel::Named("Greek".to_string()),
            Script::Hebrew => LanguageLabel::Named("Hebrew".to_string()),
            Script::Devanagari => LanguageLabel::Named("Hindi".to_string()),
            Script::Hangul => LanguageLabel::Named("Korean".to_string()),
            Script::Kana => LanguageLabel::Named("Japanese".to_string()),
            Script::Han if kana => LanguageLabel::Named("Japanese".to_string()),
            Script::Han => LanguageLabel::Named("Chinese".to_string()),
            Script::Thai => LanguageLabel::Named("Thai".to_string()),
        }
    }
}

#[async_trait]
impl LanguageDetector for ScriptDetector {
    async fn detect(&self, text: &str) -> LanguageLabel {
        if let Some(label) = preclassify(text) {
            return label;
        }
        Self::classify(text.trim())
    }
}

/// Detector backed by the completion model.
pub struct GenerativeDetector {
    model: Arc<dyn CompletionModel>,
    composer: PromptComposer,
}

impl GenerativeDetector {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self {
            model,
            composer: PromptComposer::new(),
        }
    }
}

#[async_trait]
impl LanguageDetector for GenerativeDetector {
    async fn detect(&self, text: &str) -> LanguageLabel {
        if let Some(label) = preclassify(text) {
            return label;
        }

        let prompt = self.composer.compose(DETECTION_INSTRUCTIONS, text.trim(), &[]);
        match self
            .model
            .complete(&prompt, &GenerationParams::detection())
            .await
        {
            Ok(reply) => {
                // The model is told to answer with a bare language name;
                // take the first line defensively anyway.
                let name = reply.lines().next().unwrap_or("").trim();
                LanguageLabel::from_name(name)
            }
            Err(err) => {
                tracing::warn!(error = %err, "language detection call failed, treating as Unknown");
                LanguageLabel::Unknown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentora_core::{MentoraError, Result};

    #[tokio::test]
    async fn empty_and_whitespace_input_is_unknown() {
        let detector = ScriptDetector::new();
        assert_eq!(detector.detect("").await, LanguageLabel::Unknown);
        assert_eq!(detector.detect("   \n\t").await, LanguageLabel::Unknown);
    }

    #[tokio::test]
    async fn short_fragments_default_to_english() {
        let detector = ScriptDetector::new();
        assert_eq!(detector.detect("hi").await, LanguageLabel::English);
        assert_eq!(detector.detect("  ok  ").await, LanguageLabel::English);
        // Short non-Latin text too: the threshold applies before any
        // classification.
        assert_eq!(detector.detect("سلام").await, LanguageLabel::English);
    }

    #[tokio::test]
    async fn scripts_map_to_their_languages() {
        let detector = ScriptDetector::new();
        assert_eq!(
            detector.detect("سلام، چطور هستید؟").await.as_str(),
            "Persian"
        );
        assert_eq!(detector.detect("مرحبا بالعالم كيف الحال").await.as_str(), "Arabic");
        assert_eq!(detector.detect("Привет, как дела?").await.as_str(), "Russian");
        assert_eq!(detector.detect("Γειά σου κόσμε").await.as_str(), "Greek");
        assert_eq!(detector.detect("שלום עולם ומה נשמע").await.as_str(), "Hebrew");
        assert_eq!(detector.detect("नमस्ते दुनिया").await.as_str(), "Hindi");
        assert_eq!(detector.detect("안녕하세요 세계").await.as_str(), "Korean");
        assert_eq!(detector.detect("こんにちは世界").await.as_str(), "Japanese");
        assert_eq!(detector.detect("你好世界你好世界").await.as_str(), "Chinese");
        assert_eq!(detector.detect("Hello there, how are you?").await, LanguageLabel::English);
    }

    #[tokio::test]
    async fn numbers_and_punctuation_alone_are_unknown() {
        let detector = ScriptDetector::new();
        assert_eq!(detector.detect("12345 678!?").await, LanguageLabel::Unknown);
    }

    struct FixedReply(&'static str);

    #[async_trait]
    impl CompletionModel for FixedReply {
        async fn complete(&self, _prompt: &str, _params: &GenerationParams) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct AlwaysFails;

    #[async_trait]
    impl CompletionModel for AlwaysFails {
        async fn complete(&self, _prompt: &str, _params: &GenerationParams) -> Result<String> {
            Err(MentoraError::completion("connection refused"))
        }
    }

    #[tokio::test]
    async fn generative_detector_normalizes_the_model_reply() {
        let detector = GenerativeDetector::new(Arc::new(FixedReply("Persian\n")));
        assert_eq!(detector.detect("سلام، چطور هستید؟").await.as_str(), "Persian");

        let detector = GenerativeDetector::new(Arc::new(FixedReply("english")));
        assert_eq!(detector.detect("hello over there").await, LanguageLabel::English);
    }

    #[tokio::test]
    async fn generative_detector_fails_open_to_unknown() {
        let detector = GenerativeDetector::new(Arc::new(AlwaysFails));
        assert_eq!(
            detector.detect("hello over there").await,
            LanguageLabel::Unknown
        );
    }
}
