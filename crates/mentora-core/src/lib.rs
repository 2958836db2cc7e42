//! Core domain layer for Mentora.
//!
//! This crate contains the "pure" building blocks the rest of the workspace
//! is assembled from: the shared error type, language labels, the
//! conversation domain models with their repository trait, and the wire
//! contract DTOs for a chat turn. It performs no I/O of its own.

pub mod error;
pub mod language;
pub mod session;
pub mod turn;

pub use error::{MentoraError, Result};
pub use language::LanguageLabel;
pub use session::{ChatMessage, ConversationSession, ConversationStore, Sender};
pub use turn::{HistoryEntry, TurnRequest, TurnResponse};
