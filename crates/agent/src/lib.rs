//! Conversational agent for the tax saving assistant
//!
//! Features:
//! - Stage-based dialogue management (consent, income/age collection,
//!   recommendations, drill-down)
//! - Session-scoped conversation state with transition history
//! - Recovery from invalid input and QA failures inside the turn

pub mod controller;
pub mod response;
pub mod state;

pub use controller::{DialogueConfig, DialogueController, TurnOutcome};
pub use state::{ConversationState, StageTransition};

use thiserror::Error;

/// Agent errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("Stage error: {0}")]
    Stage(String),
}
