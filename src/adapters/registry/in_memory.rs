//! In-memory session registry.
//!
//! Default registry backend: a map guarded by a read-write lock. Lookups by
//! different sessions never block each other beyond map access; the
//! orchestrator's per-session mutex provides turn-level serialization.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::foundation::{EngineError, SessionId};
use crate::domain::session::{Session, SessionPatch};
use crate::ports::SessionRegistry;

/// In-memory registry of session records.
#[derive(Default)]
pub struct InMemorySessionRegistry {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl InMemorySessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRegistry for InMemorySessionRegistry {
    async fn create(&self, session: Session) -> Result<Session, EngineError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| EngineError::storage("session registry lock poisoned"))?;
        sessions.insert(*session.id(), session.clone());
        Ok(session)
    }

    async fn get(&self, id: &SessionId) -> Result<Option<Session>, EngineError> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| EngineError::storage("session registry lock poisoned"))?;
        Ok(sessions.get(id).cloned())
    }

    async fn update(&self, id: &SessionId, patch: SessionPatch) -> Result<Session, EngineError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| EngineError::storage("session registry lock poisoned"))?;
        let session = sessions
            .get_mut(id)
            .ok_or(EngineError::SessionNotFound(*id))?;
        session.apply(patch);
        Ok(session.clone())
    }

    async fn end(&self, id: &SessionId) -> Result<Session, EngineError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| EngineError::storage("session registry lock poisoned"))?;
        let session = sessions
            .get_mut(id)
            .ok_or(EngineError::SessionNotFound(*id))?;
        session.end();
        Ok(session.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn session() -> Session {
        Session::new(SessionId::new(), "p-1", "empathy_study", BTreeMap::new())
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let registry = InMemorySessionRegistry::new();
        let created = registry.create(session()).await.unwrap();

        let fetched = registry.get(created.id()).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn get_unknown_session_is_none() {
        let registry = InMemorySessionRegistry::new();
        assert!(registry.get(&SessionId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_unknown_session_is_not_found() {
        let registry = InMemorySessionRegistry::new();
        let err = registry
            .update(&SessionId::new(), SessionPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::SessionNotFound(_)));
    }

    #[tokio::test]
    async fn update_merges_counters() {
        let registry = InMemorySessionRegistry::new();
        let created = registry.create(session()).await.unwrap();

        let updated = registry
            .update(
                created.id(),
                SessionPatch {
                    exchange_count: Some(2),
                    turn_count: Some(4),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.exchange_count(), 2);
        assert_eq!(updated.turn_count(), 4);
    }

    #[tokio::test]
    async fn end_is_idempotent() {
        let registry = InMemorySessionRegistry::new();
        let created = registry.create(session()).await.unwrap();

        let ended = registry.end(created.id()).await.unwrap();
        assert!(!ended.is_active());
        let ended_at = *ended.ended_at().unwrap();

        let again = registry.end(created.id()).await.unwrap();
        assert_eq!(again.ended_at(), Some(&ended_at));
    }
}
