//! Client for the external generative completion endpoint.
//!
//! The endpoint speaks a small JSON contract: requests carry
//! `{prompt, max_gen_len, temperature, top_p}` and responses carry a
//! `generation` text field. The field is read with a default - callers never
//! index into an assumed-present field.

use crate::params::GenerationParams;
use async_trait::async_trait;
use mentora_core::{MentoraError, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The generative model behind every text-producing step.
///
/// A failed completion has no safe fallback text, so errors surface to the
/// caller instead of degrading silently (unlike translation).
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Generates a completion for the composed prompt.
    ///
    /// # Errors
    ///
    /// Returns [`MentoraError::Completion`] on transport or decode failure.
    async fn complete(&self, prompt: &str, params: &GenerationParams) -> Result<String>;
}

/// Completion client that talks to the model-serving HTTP endpoint.
#[derive(Clone)]
pub struct HttpCompletionClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpCompletionClient {
    /// Creates a new client for the given invoke endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_timeout(endpoint, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a client with a custom request timeout.
    ///
    /// Every external call in the pipeline is bounded; a timeout surfaces
    /// the same way as any other transport failure.
    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            endpoint: endpoint.into(),
            api_key: None,
        }
    }

    /// Attaches an API key sent as the `x-api-key` header.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Loads the endpoint and optional API key from the environment.
    ///
    /// Reads `MENTORA_COMPLETION_URL` and `MENTORA_COMPLETION_API_KEY`.
    pub fn try_from_env() -> Result<Self> {
        let endpoint = env::var("MENTORA_COMPLETION_URL").map_err(|_| {
            MentoraError::config("MENTORA_COMPLETION_URL not set and no config file provided")
        })?;

        let mut client = Self::new(endpoint);
        if let Ok(api_key) = env::var("MENTORA_COMPLETION_API_KEY") {
            client = client.with_api_key(api_key);
        }
        Ok(client)
    }

    async fn send_request(&self, body: &GenerateRequest<'_>) -> Result<String> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .json(body);

        if let Some(api_key) = &self.api_key {
            request = request.header("x-api-key", api_key);
        }

        let response = request.send().await.map_err(|err| {
            if err.is_timeout() {
                MentoraError::completion(format!("completion request timed out: {err}"))
            } else {
                MentoraError::completion(format!("completion request failed: {err}"))
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: GenerateResponse = response.json().await.map_err(|err| {
            MentoraError::completion(format!("failed to parse completion response: {err}"))
        })?;

        Ok(parsed.generation.trim().to_string())
    }
}

#[async_trait]
impl CompletionModel for HttpCompletionClient {
    async fn complete(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        let request = GenerateRequest {
            prompt,
            max_gen_len: params.max_gen_len,
            temperature: params.temperature,
            top_p: params.top_p,
        };

        self.send_request(&request).await
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    max_gen_len: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    generation: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn map_http_error(status: StatusCode, body: String) -> MentoraError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    let retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    let qualifier = if retryable { "retryable " } else { "" };
    MentoraError::completion(format!(
        "completion endpoint returned {}{} error: {}",
        qualifier,
        status.as_u16(),
        message
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_generation_field_defaults_to_empty() {
        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.generation, "");
    }

    #[test]
    fn request_serializes_the_wire_fields() {
        let request = GenerateRequest {
            prompt: "hello",
            max_gen_len: 500,
            temperature: 0.7,
            top_p: 0.9,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["prompt"], "hello");
        assert_eq!(value["max_gen_len"], 500);
    }

    #[test]
    fn http_errors_carry_the_body_message() {
        let err = map_http_error(
            StatusCode::SERVICE_UNAVAILABLE,
            r#"{"error": {"message": "model cold-starting"}}"#.to_string(),
        );
        assert!(err.is_completion());
        assert!(err.to_string().contains("model cold-starting"));
        assert!(err.to_string().contains("retryable"));
    }
}
