//! Client for the external intent-classification/grounding engine.
//!
//! The engine receives the working-language user message plus the session
//! identifier (it keeps its own dialogue state keyed by that id) and answers
//! with a list of reply objects. The first non-empty `text` becomes the
//! grounding passage; a missing or empty reply list grounds to the empty
//! string, which the prompt composer tolerates.

use async_trait::async_trait;
use mentora_core::{MentoraError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::env;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// A grounding passage plus any structured metadata the engine attached.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroundingResult {
    /// The grounding passage; empty when the engine had nothing
    pub text: String,
    /// Engine-specific extra fields, passed through opaquely
    pub metadata: Value,
}

/// The intent/retrieval engine behind the `Grounded` stage.
#[async_trait]
pub trait GroundingEngine: Send + Sync {
    /// Sends the normalized message and obtains a grounding passage.
    ///
    /// Retries are transport-safe only: the engine may hold per-session
    /// dialogue state, so a retried call is not semantically idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`MentoraError::Grounding`] on transport or decode failure.
    async fn ground(&self, message: &str, session_id: &str) -> Result<GroundingResult>;
}

/// Grounding client that posts to the engine's REST webhook.
#[derive(Clone)]
pub struct HttpGroundingClient {
    client: Client,
    endpoint: String,
}

impl HttpGroundingClient {
    /// Creates a new client for the given webhook endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_timeout(endpoint, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a client with a custom request timeout.
    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            endpoint: endpoint.into(),
        }
    }

    /// Loads the endpoint from `MENTORA_GROUNDING_URL`.
    pub fn try_from_env() -> Result<Self> {
        let endpoint = env::var("MENTORA_GROUNDING_URL").map_err(|_| {
            MentoraError::config("MENTORA_GROUNDING_URL not set and no config file provided")
        })?;
        Ok(Self::new(endpoint))
    }
}

#[async_trait]
impl GroundingEngine for HttpGroundingClient {
    async fn ground(&self, message: &str, session_id: &str) -> Result<GroundingResult> {
        let body = EngineRequest { sender: session_id, message };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|err| MentoraError::grounding(format!("engine request failed: {err}")))?;

        if !response.status().is_success() {
            return Err(MentoraError::grounding(format!(
                "engine returned status {}",
                response.status().as_u16()
            )));
        }

        let replies: Vec<EngineReply> = response
            .json()
            .await
            .map_err(|err| MentoraError::grounding(format!("failed to parse engine reply: {err}")))?;

        Ok(first_text(replies))
    }
}

fn first_text(replies: Vec<EngineReply>) -> GroundingResult {
    replies
        .into_iter()
        .find(|reply| !reply.text.is_empty())
        .map(|reply| GroundingResult {
            text: reply.text,
            metadata: Value::Object(reply.extra),
        })
        .unwrap_or_default()
}

#[derive(Serialize)]
struct EngineRequest<'a> {
    sender: &'a str,
    message: &'a str,
}

#[derive(Deserialize)]
struct EngineReply {
    #[serde(default)]
    text: String,
    #[serde(flatten)]
    extra: serde_json::Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_reply_list_grounds_to_empty_text() {
        let result = first_text(Vec::new());
        assert_eq!(result.text, "");
    }

    #[test]
    fn first_non_empty_text_wins() {
        let replies: Vec<EngineReply> = serde_json::from_str(
            r#"[
                {"recipient_id": "s1"},
                {"recipient_id": "s1", "text": "Visa processing takes 3 weeks."},
                {"recipient_id": "s1", "text": "ignored"}
            ]"#,
        )
        .unwrap();

        let result = first_text(replies);
        assert_eq!(result.text, "Visa processing takes 3 weeks.");
        assert_eq!(result.metadata["recipient_id"], "s1");
    }

    #[test]
    fn missing_text_field_defaults_rather_than_failing() {
        let replies: Vec<EngineReply> =
            serde_json::from_str(r#"[{"recipient_id": "s1", "buttons": []}]"#).unwrap();
        assert_eq!(first_text(replies).text, "");
    }
}
