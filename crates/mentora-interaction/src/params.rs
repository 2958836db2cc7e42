//! Generation parameters for the completion endpoint.

use serde::{Deserialize, Serialize};

/// Sampling configuration passed with every completion call.
///
/// The three named profiles match how each pipeline step uses the model:
/// detection wants short, near-deterministic output; translation wants
/// faithful mid-length output; answering wants room to be conversational.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Maximum number of tokens to generate
    pub max_gen_len: u32,
    /// Sampling randomness; 0 is near-deterministic
    pub temperature: f32,
    /// Nucleus sampling mass
    pub top_p: f32,
}

impl GenerationParams {
    /// Profile for language detection calls.
    pub fn detection() -> Self {
        Self {
            max_gen_len: 50,
            temperature: 0.1,
            top_p: 0.9,
        }
    }

    /// Profile for translation calls.
    pub fn translation() -> Self {
        Self {
            max_gen_len: 500,
            temperature: 0.2,
            top_p: 0.9,
        }
    }

    /// Profile for answer generation.
    pub fn answer() -> Self {
        Self {
            max_gen_len: 500,
            temperature: 0.7,
            top_p: 0.9,
        }
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::answer()
    }
}
