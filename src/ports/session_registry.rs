//! Session registry port.
//!
//! Contract for creating, retrieving, updating, and terminating session
//! records. Implementations must serialize concurrent access per session id
//! while letting different sessions proceed independently.

use async_trait::async_trait;

use crate::domain::foundation::{EngineError, SessionId};
use crate::domain::session::{Session, SessionPatch};

/// Registry port for session lifecycle persistence.
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Persists a freshly created session.
    ///
    /// # Errors
    ///
    /// - `Storage` on persistence failure
    async fn create(&self, session: Session) -> Result<Session, EngineError>;

    /// Pure lookup; `None` when the session does not exist.
    async fn get(&self, id: &SessionId) -> Result<Option<Session>, EngineError>;

    /// Merges a partial update into an existing session.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session does not exist
    async fn update(&self, id: &SessionId, patch: SessionPatch) -> Result<Session, EngineError>;

    /// Ends a session. Idempotent: ending an already-ended session returns
    /// its current state.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session does not exist
    async fn end(&self, id: &SessionId) -> Result<Session, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_registry_is_object_safe() {
        fn _accepts_dyn(_registry: &dyn SessionRegistry) {}
    }
}
