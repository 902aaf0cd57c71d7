//! Per-session transient working state consumed by the stage engine.
//!
//! The state is rehydrated on every call from the session record and the
//! conversation store's turn log; nothing here is cached between calls.
//! Topic coverage is re-derived by classifying the stored assistant turns,
//! so it is always consistent with the log.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::foundation::Timestamp;

use super::{Stage, TopicTracker};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Participant,
    Assistant,
}

/// One utterance in the conversation, immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    pub timestamp: Timestamp,
}

impl Turn {
    /// Creates a turn stamped with the current time.
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Timestamp::now(),
        }
    }

    /// Creates a participant turn.
    pub fn participant(text: impl Into<String>) -> Self {
        Self::new(Role::Participant, text)
    }

    /// Creates an assistant turn.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }
}

/// Working state for one stage-machine step.
///
/// Owned exclusively by the session it belongs to; never shared across
/// sessions.
#[derive(Debug, Clone)]
pub struct ConversationState {
    /// Ordered turn history, append order = wall-clock order.
    pub turns: Vec<Turn>,
    /// Coverage categories detected so far in assistant utterances.
    pub topics_covered: BTreeSet<String>,
    /// Current stage of the state machine.
    pub stage: Stage,
    /// Latched false once closing is entered.
    pub should_continue: bool,
    /// Exchanges completed so far, from the session record.
    pub exchange_count: u32,
}

impl ConversationState {
    /// Rebuilds working state from the persisted turn log and session
    /// counters.
    ///
    /// Stage derivation: no assistant turn yet means `Initial`; an inactive
    /// session means `Closing`; everything else is `Exploring`.
    pub fn rehydrate(turns: Vec<Turn>, exchange_count: u32, is_active: bool) -> Self {
        let topics_covered = turns
            .iter()
            .filter(|turn| turn.role == Role::Assistant)
            .flat_map(|turn| TopicTracker::classify(&turn.text))
            .collect();

        let has_assistant_turn = turns.iter().any(|turn| turn.role == Role::Assistant);
        let stage = if !is_active {
            Stage::Closing
        } else if !has_assistant_turn {
            Stage::Initial
        } else {
            Stage::Exploring
        };

        Self {
            turns,
            topics_covered,
            stage,
            should_continue: is_active,
            exchange_count,
        }
    }

    /// The most recent `limit` turns, oldest first.
    pub fn recent_turns(&self, limit: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(limit);
        &self.turns[start..]
    }

    /// The text of the most recent assistant turn, if any.
    pub fn last_assistant_text(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|turn| turn.role == Role::Assistant)
            .map(|turn| turn.text.as_str())
    }
}
