//! Session aggregate entity.
//!
//! A session is one participant's run through one experiment, from start to
//! close. It is created exactly once, mutated only through
//! [`Session::apply`] and [`Session::end`], and terminated exactly once.
//!
//! # Invariants
//!
//! - `ended_at` is set if and only if `is_active` is false
//! - `exchange_count` and `turn_count` are monotonically non-decreasing

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::{SessionId, Timestamp};

/// Session aggregate - lifecycle record for one interview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier for this session.
    id: SessionId,

    /// Participant running the interview.
    participant_id: String,

    /// Experiment this session belongs to.
    experiment_id: String,

    /// Participant-supplied info, validated against the experiment's
    /// declared fields at creation.
    participant_info: BTreeMap<String, String>,

    /// When the session was created.
    created_at: Timestamp,

    /// When the session ended; set exactly when `is_active` flips false.
    ended_at: Option<Timestamp>,

    /// Whether the session is still accepting turns.
    is_active: bool,

    /// Completed assistant/participant exchanges.
    exchange_count: u32,

    /// Total turns appended to the conversation log.
    turn_count: u32,
}

/// Partial update applied to a session after a processed turn.
///
/// Only recognized fields exist by construction; counters are clamped so
/// they can never regress.
#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub exchange_count: Option<u32>,
    pub turn_count: Option<u32>,
}

impl Session {
    /// Creates a new active session with counters at zero.
    pub fn new(
        id: SessionId,
        participant_id: impl Into<String>,
        experiment_id: impl Into<String>,
        participant_info: BTreeMap<String, String>,
    ) -> Self {
        Self {
            id,
            participant_id: participant_id.into(),
            experiment_id: experiment_id.into(),
            participant_info,
            created_at: Timestamp::now(),
            ended_at: None,
            is_active: true,
            exchange_count: 0,
            turn_count: 0,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    /// Returns the session ID.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Returns the participant identifier.
    pub fn participant_id(&self) -> &str {
        &self.participant_id
    }

    /// Returns the experiment identifier.
    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }

    /// Returns the participant info mapping.
    pub fn participant_info(&self) -> &BTreeMap<String, String> {
        &self.participant_info
    }

    /// The participant's conversation-depth preference, when supplied.
    pub fn depth_preference(&self) -> Option<&str> {
        self.participant_info
            .get("conversation_depth")
            .map(String::as_str)
    }

    /// Returns when the session was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns when the session ended, if it has.
    pub fn ended_at(&self) -> Option<&Timestamp> {
        self.ended_at.as_ref()
    }

    /// Whether the session is still accepting turns.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Completed exchanges so far.
    pub fn exchange_count(&self) -> u32 {
        self.exchange_count
    }

    /// Total turns appended so far.
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    // ─────────────────────────────────────────────────────────────────────
    // Mutation
    // ─────────────────────────────────────────────────────────────────────

    /// Merges a partial update. Counters only ever move forward.
    pub fn apply(&mut self, patch: SessionPatch) {
        if let Some(exchanges) = patch.exchange_count {
            self.exchange_count = self.exchange_count.max(exchanges);
        }
        if let Some(turns) = patch.turn_count {
            self.turn_count = self.turn_count.max(turns);
        }
    }

    /// Ends the session. Idempotent: ending an already-ended session leaves
    /// it unchanged.
    pub fn end(&mut self) {
        if self.is_active {
            self.is_active = false;
            self.ended_at = Some(Timestamp::now());
        }
    }
}
