//! Stage engine - the interview state machine.
//!
//! The engine is pure: given the experiment definition and the rehydrated
//! conversation state it plans exactly one step. Side effects (generation
//! calls, persistence, session updates) are executed by the orchestrator.
//!
//! Transitions, evaluated once per incoming participant turn:
//!
//! - `Initial` -> `Exploring`: emit the static opening probe, no generation
//!   call.
//! - `Exploring` -> `Exploring`: exit policy says continue; build one
//!   generation instruction with a bounded window of recent turns.
//! - `Exploring` -> `Closing`: exit policy says end; emit the fixed closing
//!   message, no generation call.
//! - `Closing`: terminal; further input is acknowledged with the closing
//!   message again, nothing advances.

use crate::domain::experiment::ExperimentDefinition;

use super::{
    build_instruction, ConversationState, ExitDecision, ExitPolicy, Stage, TopicTracker, Turn,
};

/// Fixed closing message emitted when the interview ends.
pub const CLOSING_MESSAGE: &str = "Thank you so much for sharing your experiences with me. \
    Your responses will help us better understand the moments you described. \
    Have a great day!";

/// Number of recent turns included in the generation window.
const CONTEXT_WINDOW_TURNS: usize = 6;

/// One planned step of the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageStep {
    /// Emit the experiment's static opening probe and move to `Exploring`.
    Greet { text: String },

    /// Invoke the generation collaborator once for an adaptive follow-up.
    Probe {
        instruction: String,
        window: Vec<Turn>,
        next_focus: String,
    },

    /// Emit the fixed closing message and move to `Closing`.
    Close { text: String },

    /// Terminal: acknowledge input with the closing message, advance nothing.
    Acknowledge { text: String },
}

/// Plans state-machine steps. Stateless; all inputs arrive per call.
pub struct StageEngine;

impl StageEngine {
    /// Plans the single step for one incoming participant turn.
    ///
    /// `incoming` is the participant's new utterance, not yet persisted; it
    /// participates in the generation window but not in exit evaluation.
    pub fn plan(
        definition: &ExperimentDefinition,
        state: &ConversationState,
        incoming: Option<&str>,
        depth_preference: Option<&str>,
    ) -> StageStep {
        match state.stage {
            Stage::Initial => StageStep::Greet {
                text: definition.initial_question.greeting(),
            },
            Stage::Exploring => {
                match ExitPolicy::evaluate(definition, state, depth_preference) {
                    ExitDecision::End => StageStep::Close {
                        text: CLOSING_MESSAGE.to_string(),
                    },
                    ExitDecision::Continue => {
                        let next_focus =
                            TopicTracker::next_focus(&state.topics_covered, &definition.goals);
                        let instruction = build_instruction(
                            definition,
                            &state.topics_covered,
                            &next_focus,
                            state.exchange_count,
                        );
                        StageStep::Probe {
                            instruction,
                            window: Self::window(state, incoming),
                            next_focus,
                        }
                    }
                }
            }
            Stage::Closing => StageStep::Acknowledge {
                text: CLOSING_MESSAGE.to_string(),
            },
        }
    }

    /// The most recent turns plus the incoming participant utterance,
    /// bounded to the context window.
    fn window(state: &ConversationState, incoming: Option<&str>) -> Vec<Turn> {
        let mut turns = state.turns.clone();
        if let Some(text) = incoming {
            turns.push(Turn::participant(text));
        }
        let start = turns.len().saturating_sub(CONTEXT_WINDOW_TURNS);
        turns.split_off(start)
    }
}
