//! Application layer - the orchestrator façade composed over the ports.

mod orchestrator;

pub use orchestrator::{
    GenerationSettings, Interviewer, SessionStart, TurnOutcome, FALLBACK_MESSAGE,
};
