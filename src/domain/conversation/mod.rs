//! Conversation policy - the stage machine and its advisors.
//!
//! The stage engine plans exactly one step per incoming participant turn.
//! The exit policy decides when to stop, the topic tracker reports coverage
//! of the research goals, and the instruction builder renders the generation
//! request for adaptive follow-up questions.

mod engine;
mod exit_policy;
mod instruction;
mod stage;
mod state;
mod topics;

pub use engine::{StageEngine, StageStep, CLOSING_MESSAGE};
pub use exit_policy::{ExitDecision, ExitPolicy, DEFAULT_MAX_EXCHANGES};
pub use instruction::build_instruction;
pub use stage::Stage;
pub use state::{ConversationState, Role, Turn};
pub use topics::TopicTracker;
