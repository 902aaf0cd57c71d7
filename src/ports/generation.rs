//! Generation provider port - interface for LLM integrations.
//!
//! The orchestrator treats "produce the next utterance given an instruction
//! and a conversation window" as an opaque, fallible capability. Adapters
//! connect to concrete providers (OpenAI, Anthropic) or supply canned output
//! for tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::conversation::{Role, Turn};

/// Port for text-generation collaborators.
///
/// The call may have unbounded latency; callers must not hold any lock
/// broader than the owning session across it.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Generates the next assistant utterance.
    ///
    /// # Errors
    ///
    /// Provider and network failures surface as [`GenerationError`]; the
    /// orchestrator recovers with a fallback turn rather than failing the
    /// session.
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}

/// Request for one generated utterance.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// System instruction steering the follow-up question.
    pub instruction: String,
    /// Bounded window of recent conversation turns, oldest first.
    pub window: Vec<Message>,
    /// Sampling temperature.
    pub temperature: Option<f32>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
}

impl GenerationRequest {
    /// Creates a request with the given instruction and an empty window.
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            window: Vec::new(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Sets the conversation window from domain turns.
    pub fn with_turns(mut self, turns: &[Turn]) -> Self {
        self.window = turns.iter().map(Message::from_turn).collect();
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// A message in provider-agnostic format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    /// Creates a new message.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    /// Maps a conversation turn into provider terms.
    pub fn from_turn(turn: &Turn) -> Self {
        let role = match turn.role {
            Role::Participant => MessageRole::User,
            Role::Assistant => MessageRole::Assistant,
        };
        Self::new(role, turn.text.clone())
    }
}

/// Role of the message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Generation collaborator errors.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// Provider is unavailable.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Provider returned an empty utterance.
    #[error("provider returned empty output")]
    Empty,

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl GenerationError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if the same request may succeed on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::RateLimited { .. }
                | GenerationError::Unavailable(_)
                | GenerationError::Network(_)
                | GenerationError::Timeout { .. }
                | GenerationError::Empty
        )
    }
}
