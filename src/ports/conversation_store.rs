//! Conversation store port.
//!
//! Append-only per-session turn log plus a parallel structured
//! question/answer log. Whether a session exists at all is the registry's
//! question, not this store's: exporting an unknown session yields an
//! empty-but-well-formed structure.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::conversation::{Role, Turn};
use crate::domain::foundation::{EngineError, SessionId, Timestamp};

/// Store port for conversation history.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Appends one turn to the session's log.
    async fn append_turn(
        &self,
        session_id: &SessionId,
        role: Role,
        text: &str,
    ) -> Result<(), EngineError>;

    /// Appends one structured question/answer pair.
    async fn append_response(
        &self,
        session_id: &SessionId,
        question: &str,
        answer: &str,
    ) -> Result<(), EngineError>;

    /// All turns for a session, in append order.
    async fn turns(&self, session_id: &SessionId) -> Result<Vec<Turn>, EngineError>;

    /// All structured responses for a session, in append order.
    async fn responses(&self, session_id: &SessionId) -> Result<Vec<ResponseRecord>, EngineError>;

    /// Pure snapshot of everything stored for a session. Deterministic given
    /// identical stored state; never mutates.
    async fn export(&self, session_id: &SessionId) -> Result<SessionExport, EngineError>;
}

/// One structured question/answer pair, immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub question: String,
    pub answer: String,
    pub timestamp: Timestamp,
}

impl ResponseRecord {
    /// Creates a record stamped with the current time.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            timestamp: Timestamp::now(),
        }
    }
}

/// Complete export of one session's stored conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionExport {
    pub metadata: ExportMetadata,
    pub turns: Vec<Turn>,
    pub responses: Vec<ResponseRecord>,
}

impl SessionExport {
    /// An empty-but-well-formed export for a session with nothing stored.
    pub fn empty(session_id: SessionId) -> Self {
        Self {
            metadata: ExportMetadata {
                session_id,
                turn_count: 0,
                response_count: 0,
            },
            turns: Vec::new(),
            responses: Vec::new(),
        }
    }
}

/// Export header derived purely from stored state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub session_id: SessionId,
    pub turn_count: usize,
    pub response_count: usize,
}
