//! Prompt composition for the Llama 3 chat template.
//!
//! The completion endpoint expects a single text blob with fixed delimiter
//! tokens: one system segment, alternating user/assistant segments
//! reconstructed from history in the given order, the current user message,
//! and an open assistant segment for the model to fill in.

use mentora_core::HistoryEntry;

const BEGIN_OF_TEXT: &str = "<|begin_of_text|>";
const END_OF_TURN: &str = "<|eot_id|>";

/// Composes prompts in the model-specific transcript format.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptComposer;

impl PromptComposer {
    pub fn new() -> Self {
        Self
    }

    /// Builds the full prompt blob.
    ///
    /// History entries are emitted in the order given - the composer never
    /// reorders or deduplicates. An entry with role `"user"` becomes a user
    /// segment; any other role becomes an assistant segment.
    pub fn compose(&self, system: &str, user_message: &str, history: &[HistoryEntry]) -> String {
        let mut prompt = String::with_capacity(
            system.len() + user_message.len() + history.iter().map(|h| h.content.len() + 64).sum::<usize>() + 128,
        );

        prompt.push_str(BEGIN_OF_TEXT);
        prompt.push_str(&header("system"));
        prompt.push_str(system);
        prompt.push_str(END_OF_TURN);

        for entry in history {
            let role = if entry.is_user() { "user" } else { "assistant" };
            prompt.push_str(&header(role));
            prompt.push_str(&entry.content);
            prompt.push_str(END_OF_TURN);
        }

        prompt.push_str(&header("user"));
        prompt.push_str(user_message);
        prompt.push_str(END_OF_TURN);
        prompt.push_str(&header("assistant"));

        prompt
    }
}

fn header(role: &str) -> String {
    format!("<|start_header_id|>{role}<|end_header_id|>\n\n")
}
