//! The per-turn chat pipeline controller.
//!
//! Sequences detection, normalization, grounding, prompt composition,
//! completion, back-translation and persistence for one turn, applying each
//! stage's policy from [`crate::stage`]. All collaborators are injected at
//! construction time so tests can substitute fakes per external service.

use crate::persona::AdvisorPersona;
use crate::stage::TurnStage;
use mentora_core::{
    ChatMessage, ConversationSession, ConversationStore, HistoryEntry, LanguageLabel,
    MentoraError, Result, TurnRequest, TurnResponse,
};
use mentora_interaction::{
    CompletionModel, GenerationParams, GroundingEngine, LanguageDetector, PromptComposer,
    Translator,
};
use std::sync::Arc;

/// Shown (after translation) when the completion endpoint fails.
const APOLOGY_TEXT: &str = "Sorry, there was an error processing your request.";

/// Owner recorded on sessions created implicitly by a first turn.
const IMPLICIT_OWNER: &str = "anonymous";

/// Orchestrates one chat turn end to end.
pub struct ChatOrchestrator {
    detector: Arc<dyn LanguageDetector>,
    translator: Translator,
    grounding: Arc<dyn GroundingEngine>,
    completion: Arc<dyn CompletionModel>,
    store: Arc<dyn ConversationStore>,
    persona: AdvisorPersona,
    composer: PromptComposer,
    answer_params: GenerationParams,
}

impl ChatOrchestrator {
    /// Wires the pipeline with its collaborators.
    ///
    /// The translator shares the completion model, as both translation
    /// directions are served by the same generative endpoint.
    pub fn new(
        detector: Arc<dyn LanguageDetector>,
        completion: Arc<dyn CompletionModel>,
        grounding: Arc<dyn GroundingEngine>,
        store: Arc<dyn ConversationStore>,
    ) -> Self {
        Self {
            detector,
            translator: Translator::new(completion.clone()),
            grounding,
            completion,
            store,
            persona: AdvisorPersona::new(),
            composer: PromptComposer::new(),
            answer_params: GenerationParams::answer(),
        }
    }

    /// Overrides the persona after construction.
    pub fn with_persona(mut self, persona: AdvisorPersona) -> Self {
        self.persona = persona;
        self
    }

    /// Overrides the answer-generation parameters.
    pub fn with_answer_params(mut self, params: GenerationParams) -> Self {
        self.answer_params = params;
        self
    }

    /// Runs one turn through the full pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`MentoraError::Validation`] for empty input, before any
    /// external call and with nothing persisted. Every other failure mode
    /// resolves to a well-formed envelope per the stage policies.
    pub async fn handle_turn(&self, request: TurnRequest) -> Result<TurnResponse> {
        // Received
        let raw = request.message.trim();
        if raw.is_empty() {
            return Err(MentoraError::validation("message must not be empty"));
        }
        let session_id = request.session_id.as_str();

        // LanguageDetected
        let detected = self.detector.detect(raw).await;
        tracing::debug!(stage = %TurnStage::LanguageDetected, language = %detected, "turn language detected");

        // Normalized (fail-open inside the translator)
        let normalized = self.translator.to_working_language(raw, &detected).await;

        // Grounded
        let grounding_context = match self.grounding.ground(&normalized, session_id).await {
            Ok(result) => result.text,
            Err(err) => {
                tracing::warn!(stage = %TurnStage::Grounded, error = %err, "grounding failed, continuing without context");
                String::new()
            }
        };

        // Composed - history always re-read from the store; the request's
        // own history is only trusted when the store has never seen this
        // session.
        let history = self.reconstruct_history(session_id, &request.history).await;
        let system = self.persona.instructions(&grounding_context)?;
        let prompt = self.composer.compose(&system, &normalized, &history);
        tracing::debug!(stage = %TurnStage::Composed, history_len = history.len(), "prompt composed");

        // Completed - the only stage whose failure has no silent substitute.
        // The rest of the pipeline runs on the apology text so the user
        // still gets a reply in their own language.
        let (answer_working, completion_failed) =
            match self.completion.complete(&prompt, &self.answer_params).await {
                Ok(text) if !text.is_empty() => (text, false),
                Ok(_) => {
                    tracing::error!(stage = %TurnStage::Completed, "completion returned empty text");
                    (APOLOGY_TEXT.to_string(), true)
                }
                Err(err) => {
                    tracing::error!(stage = %TurnStage::Completed, error = %err, "completion failed");
                    (APOLOGY_TEXT.to_string(), true)
                }
            };

        // Translated
        let answer = self
            .translator
            .from_working_language(&answer_working, &detected)
            .await;

        // Persisted - a store failure is logged but never takes down a turn
        // whose answer is already computed.
        if let Err(err) = self
            .persist_turn(session_id, raw, &detected, &normalized, &answer, &answer_working)
            .await
        {
            tracing::error!(stage = %TurnStage::Persisted, error = %err, "failed to persist turn");
        } else {
            tracing::info!(
                stage = %TurnStage::Persisted,
                session_id,
                language = %detected,
                degraded = completion_failed,
                "turn persisted"
            );
        }

        // Responded
        Ok(TurnResponse::new(
            session_id, answer, &detected, raw, normalized,
        ))
    }

    /// Rebuilds prompt history from the store, in stored working-language
    /// form, ordered chronologically.
    async fn reconstruct_history(
        &self,
        session_id: &str,
        request_history: &[HistoryEntry],
    ) -> Vec<HistoryEntry> {
        let stored = match self.store.messages(session_id).await {
            Ok(messages) => messages,
            Err(err) => {
                tracing::warn!(error = %err, "could not read stored history, falling back to request history");
                return request_history.to_vec();
            }
        };

        if stored.is_empty() {
            return request_history.to_vec();
        }

        stored
            .iter()
            .map(|message| HistoryEntry {
                role: message.sender.as_role().to_string(),
                content: message.working_language_text().to_string(),
            })
            .collect()
    }

    async fn persist_turn(
        &self,
        session_id: &str,
        raw: &str,
        detected: &LanguageLabel,
        normalized: &str,
        answer_shown: &str,
        answer_working: &str,
    ) -> Result<()> {
        let session = match self.store.find_session(session_id).await? {
            Some(session) => session,
            None => {
                let session = ConversationSession::with_id(session_id, IMPLICIT_OWNER);
                self.store.save_session(&session).await?;
                session
            }
        };

        let translated_input = (!detected.is_english() && !detected.is_unknown())
            .then(|| normalized.to_string());
        let user_message = ChatMessage::user_turn(session_id, raw, detected.clone(), translated_input);
        self.store.append_message(&user_message).await?;

        let bot_message =
            ChatMessage::bot_turn(session_id, answer_shown, answer_working, detected.clone());
        self.store.append_message(&bot_message).await?;

        // Keep the session's language in step with fresh detection; an
        // Unknown result carries no information worth storing.
        if !detected.is_unknown() && session.preferred_language != *detected {
            self.store
                .set_preferred_language(session_id, detected)
                .await?;
        }

        Ok(())
    }
}
