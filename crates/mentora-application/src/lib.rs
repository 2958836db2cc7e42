//! Application layer: the per-turn chat orchestrator and session use-cases.

pub mod orchestrator;
pub mod persona;
pub mod session_usecase;
pub mod stage;

pub use orchestrator::ChatOrchestrator;
pub use persona::AdvisorPersona;
pub use session_usecase::SessionUsecase;
pub use stage::{StagePolicy, TurnStage};
