//! Bidirectional translation between a detected language and English.
//!
//! Translation is a quality enhancement, not a prerequisite: any failure
//! (network, malformed response, timeout) degrades to the untranslated
//! input, logged but never raised to the caller. A wrong-language response
//! is preferable to a hard failure of the whole turn.

use crate::completion::CompletionModel;
use crate::params::GenerationParams;
use crate::prompt::PromptComposer;
use mentora_core::LanguageLabel;
use std::sync::Arc;

/// Translator backed by the completion model.
#[derive(Clone)]
pub struct Translator {
    model: Arc<dyn CompletionModel>,
    composer: PromptComposer,
    params: GenerationParams,
}

impl Translator {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self {
            model,
            composer: PromptComposer::new(),
            params: GenerationParams::translation(),
        }
    }

    /// Translates `text` from `source` into English.
    ///
    /// Short-circuits without a network call when `source` already names
    /// English (case-insensitively) or is `Unknown`.
    pub async fn to_working_language(&self, text: &str, source: &LanguageLabel) -> String {
        if source.is_english() || source.is_unknown() {
            return text.to_string();
        }

        let instructions = format!(
            "You are a professional translator. Translate the following {source} text to English \
accurately. Maintain the original meaning, context, and intent. If there are any spelling \
errors or typos in the source text, correct them during translation. Provide ONLY the English \
translation without any additional text or explanation.",
        );

        self.translate(text, &instructions, "to English").await
    }

    /// Translates `text` from English into `target`.
    ///
    /// Same short-circuit and failure policy as [`Self::to_working_language`].
    pub async fn from_working_language(&self, text: &str, target: &LanguageLabel) -> String {
        if target.is_english() || target.is_unknown() {
            return text.to_string();
        }

        let instructions = format!(
            "You are a professional translator. Translate the following English text to {target} \
accurately. Maintain the original meaning, context, and intent. Make sure the translation is \
natural and fluent in {target}. Provide ONLY the {target} translation without any additional \
text or explanation.",
        );

        self.translate(text, &instructions, "from English").await
    }

    async fn translate(&self, text: &str, instructions: &str, direction: &str) -> String {
        let prompt = self.composer.compose(instructions, text, &[]);

        match self.model.complete(&prompt, &self.params).await {
            Ok(translated) if !translated.is_empty() => translated,
            Ok(_) => {
                tracing::warn!(direction, "translation returned empty text, keeping original");
                text.to_string()
            }
            Err(err) => {
                tracing::warn!(direction, error = %err, "translation failed, keeping original");
                text.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mentora_core::{MentoraError, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingModel {
        calls: AtomicUsize,
        reply: Result<&'static str>,
    }

    impl CountingModel {
        fn replying(reply: &'static str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                reply: Ok(reply),
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                reply: Err(MentoraError::completion("boom")),
            }
        }
    }

    #[async_trait]
    impl CompletionModel for CountingModel {
        async fn complete(&self, _prompt: &str, _params: &GenerationParams) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone().map(|s| s.to_string())
        }
    }

    #[tokio::test]
    async fn english_identity_short_circuit_makes_no_call() {
        let model = Arc::new(CountingModel::replying("should not be used"));
        let translator = Translator::new(model.clone());

        let out = translator
            .to_working_language("hello world", &LanguageLabel::English)
            .await;
        assert_eq!(out, "hello world");

        let out = translator
            .from_working_language("hello world", &LanguageLabel::Named("english".to_string()))
            .await;
        assert_eq!(out, "hello world");

        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_labels_skip_translation() {
        let model = Arc::new(CountingModel::replying("unused"));
        let translator = Translator::new(model.clone());

        let out = translator
            .to_working_language("some text", &LanguageLabel::Unknown)
            .await;
        assert_eq!(out, "some text");
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn non_english_labels_invoke_the_model() {
        let model = Arc::new(CountingModel::replying("Hello"));
        let translator = Translator::new(model.clone());

        let out = translator
            .to_working_language("سلام", &LanguageLabel::Named("Persian".to_string()))
            .await;
        assert_eq!(out, "Hello");
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_degrade_to_the_untranslated_input() {
        let translator = Translator::new(Arc::new(CountingModel::failing()));

        let out = translator
            .from_working_language("Hello", &LanguageLabel::Named("Persian".to_string()))
            .await;
        assert_eq!(out, "Hello");
    }

    #[tokio::test]
    async fn empty_model_output_keeps_the_original_text() {
        let translator = Translator::new(Arc::new(CountingModel::replying("")));

        let out = translator
            .from_working_language("Hello", &LanguageLabel::Named("Persian".to_string()))
            .await;
        assert_eq!(out, "Hello");
    }
}
