//! Error types for the domain layer.

use thiserror::Error;

use super::SessionId;

/// Errors surfaced by the interview engine to callers.
///
/// Validation and not-found variants are surfaced verbatim and never retried.
/// `Storage` and `Internal` cover unexpected collaborator failures; the
/// orchestrator guarantees a session is never left half-updated when one of
/// these occurs.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// Required participant-info fields were absent at session creation.
    #[error("missing required participant fields: {}", fields.join(", "))]
    MissingParticipantFields { fields: Vec<String> },

    /// No experiment with the given id is loaded.
    #[error("experiment '{0}' not found")]
    ExperimentNotFound(String),

    /// No session with the given id exists.
    #[error("session '{0}' not found")]
    SessionNotFound(SessionId),

    /// A persistence collaborator failed.
    #[error("storage failure: {0}")]
    Storage(String),

    /// Unexpected internal failure, reported opaquely to the caller.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Creates a missing-fields validation error.
    pub fn missing_fields(fields: Vec<String>) -> Self {
        EngineError::MissingParticipantFields { fields }
    }

    /// Creates a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        EngineError::Storage(message.into())
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        EngineError::Internal(message.into())
    }

    /// Returns true for caller errors (bad input rather than engine failure).
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            EngineError::MissingParticipantFields { .. }
                | EngineError::ExperimentNotFound(_)
                | EngineError::SessionNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_lists_every_field() {
        let err = EngineError::missing_fields(vec!["age".into(), "consent".into()]);
        assert_eq!(
            err.to_string(),
            "missing required participant fields: age, consent"
        );
    }

    #[test]
    fn caller_error_classification() {
        assert!(EngineError::ExperimentNotFound("x".into()).is_caller_error());
        assert!(EngineError::SessionNotFound(SessionId::new()).is_caller_error());
        assert!(EngineError::missing_fields(vec!["age".into()]).is_caller_error());

        assert!(!EngineError::storage("down").is_caller_error());
        assert!(!EngineError::internal("boom").is_caller_error());
    }
}
