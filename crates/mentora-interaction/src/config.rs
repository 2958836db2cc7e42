//! Backend configuration for the external-service clients.
//!
//! Read from `~/.config/mentora/config.toml`, with environment variables
//! taking precedence for endpoints and secrets:
//! `MENTORA_COMPLETION_URL`, `MENTORA_COMPLETION_API_KEY`,
//! `MENTORA_GROUNDING_URL`.

use mentora_core::{MentoraError, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Root configuration structure for config.toml
#[derive(Debug, Clone, Deserialize, Default)]
pub struct BackendConfig {
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub grounding: GroundingConfig,
    #[serde(default)]
    pub detector: DetectorConfig,
}

/// Completion endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_completion_timeout")]
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_secs: default_completion_timeout(),
        }
    }
}

/// Grounding engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GroundingConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_grounding_timeout")]
    pub timeout_secs: u64,
}

impl Default for GroundingConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: default_grounding_timeout(),
        }
    }
}

/// Which language-detection strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DetectorStrategy {
    /// Local Unicode-script classification; deterministic, no network call.
    #[default]
    Script,
    /// Completion-model-backed detection; more accurate, slower.
    Generative,
}

/// Detector configuration
#[derive(Debug, Clone, Copy, Deserialize, Default)]
pub struct DetectorConfig {
    #[serde(default)]
    pub strategy: DetectorStrategy,
}

fn default_completion_timeout() -> u64 {
    30
}

fn default_grounding_timeout() -> u64 {
    20
}

impl BackendConfig {
    /// Loads the configuration file, falling back to defaults when absent,
    /// then applies environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match config_path() {
            Some(path) if path.exists() => {
                let content = fs::read_to_string(&path).map_err(|e| {
                    MentoraError::config(format!(
                        "failed to read configuration file at {}: {e}",
                        path.display()
                    ))
                })?;
                toml::from_str(&content)?
            }
            _ => Self::default(),
        };

        if let Ok(endpoint) = env::var("MENTORA_COMPLETION_URL") {
            config.completion.endpoint = Some(endpoint);
        }
        if let Ok(api_key) = env::var("MENTORA_COMPLETION_API_KEY") {
            config.completion.api_key = Some(api_key);
        }
        if let Ok(endpoint) = env::var("MENTORA_GROUNDING_URL") {
            config.grounding.endpoint = Some(endpoint);
        }

        Ok(config)
    }

    /// The completion endpoint, required to build a live client.
    pub fn completion_endpoint(&self) -> Result<&str> {
        self.completion.endpoint.as_deref().ok_or_else(|| {
            MentoraError::config(
                "no completion endpoint configured (set MENTORA_COMPLETION_URL or \
[completion].endpoint in config.toml)",
            )
        })
    }

    /// The grounding endpoint, required to build a live client.
    pub fn grounding_endpoint(&self) -> Result<&str> {
        self.grounding.endpoint.as_deref().ok_or_else(|| {
            MentoraError::config(
                "no grounding endpoint configured (set MENTORA_GROUNDING_URL or \
[grounding].endpoint in config.toml)",
            )
        })
    }
}

/// Returns the path to the configuration file: ~/.config/mentora/config.toml
fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("mentora").join("config.toml"))
}
