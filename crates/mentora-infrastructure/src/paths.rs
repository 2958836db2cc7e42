//! Centralized path management for on-disk storage.

use mentora_core::{MentoraError, Result};
use std::path::{Path, PathBuf};

/// Resolves the directory layout used by the conversation store:
///
/// ```text
/// base_dir/
/// ├── sessions/
/// │   └── <session-id>.json
/// └── messages/
///     └── <session-id>.json
/// ```
#[derive(Debug, Clone)]
pub struct MentoraPaths {
    base_dir: PathBuf,
}

impl MentoraPaths {
    /// Uses a custom base directory (tests pass a temp dir here).
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// The default location: `~/.mentora`.
    pub fn default_location() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| MentoraError::config("could not determine home directory"))?;
        Ok(Self::new(home.join(".mentora")))
    }

    pub fn sessions_dir(&self) -> PathBuf {
        self.base_dir.join("sessions")
    }

    pub fn messages_dir(&self) -> PathBuf {
        self.base_dir.join("messages")
    }

    pub fn session_file(&self, session_id: &str) -> PathBuf {
        self.sessions_dir().join(format!("{session_id}.json"))
    }

    pub fn messages_file(&self, session_id: &str) -> PathBuf {
        self.messages_dir().join(format!("{session_id}.json"))
    }
}
