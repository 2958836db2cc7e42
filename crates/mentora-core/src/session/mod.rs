//! Conversation session domain module.
//!
//! - `model`: the session entity (`ConversationSession`)
//! - `message`: persisted chat messages (`Sender`, `ChatMessage`)
//! - `repository`: the `ConversationStore` persistence trait

mod message;
mod model;
mod repository;

pub use message::{ChatMessage, Sender};
pub use model::ConversationSession;
pub use repository::ConversationStore;
