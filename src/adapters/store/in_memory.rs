//! In-memory conversation store.
//!
//! Turn and response logs per session, lost on restart. Suitable for
//! development and tests; durable backends implement the same port.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::conversation::{Role, Turn};
use crate::domain::foundation::{EngineError, SessionId};
use crate::ports::{ConversationStore, ExportMetadata, ResponseRecord, SessionExport};

/// In-memory append-only conversation logs.
#[derive(Default)]
pub struct InMemoryConversationStore {
    turns: RwLock<HashMap<SessionId, Vec<Turn>>>,
    responses: RwLock<HashMap<SessionId, Vec<ResponseRecord>>>,
}

impl InMemoryConversationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn append_turn(
        &self,
        session_id: &SessionId,
        role: Role,
        text: &str,
    ) -> Result<(), EngineError> {
        let mut turns = self
            .turns
            .write()
            .map_err(|_| EngineError::storage("conversation store lock poisoned"))?;
        turns
            .entry(*session_id)
            .or_default()
            .push(Turn::new(role, text));
        Ok(())
    }

    async fn append_response(
        &self,
        session_id: &SessionId,
        question: &str,
        answer: &str,
    ) -> Result<(), EngineError> {
        let mut responses = self
            .responses
            .write()
            .map_err(|_| EngineError::storage("conversation store lock poisoned"))?;
        responses
            .entry(*session_id)
            .or_default()
            .push(ResponseRecord::new(question, answer));
        Ok(())
    }

    async fn turns(&self, session_id: &SessionId) -> Result<Vec<Turn>, EngineError> {
        let turns = self
            .turns
            .read()
            .map_err(|_| EngineError::storage("conversation store lock poisoned"))?;
        Ok(turns.get(session_id).cloned().unwrap_or_default())
    }

    async fn responses(&self, session_id: &SessionId) -> Result<Vec<ResponseRecord>, EngineError> {
        let responses = self
            .responses
            .read()
            .map_err(|_| EngineError::storage("conversation store lock poisoned"))?;
        Ok(responses.get(session_id).cloned().unwrap_or_default())
    }

    async fn export(&self, session_id: &SessionId) -> Result<SessionExport, EngineError> {
        let turns = self.turns(session_id).await?;
        let responses = self.responses(session_id).await?;

        Ok(SessionExport {
            metadata: ExportMetadata {
                session_id: *session_id,
                turn_count: turns.len(),
                response_count: responses.len(),
            },
            turns,
            responses,
        })
    }
}
