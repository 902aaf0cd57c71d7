//! Mock generation provider for testing.
//!
//! Configurable to return queued responses, inject errors, and capture every
//! request for verification, so tests run without calling a real provider.
//!
//! # Example
//!
//! ```ignore
//! let provider = MockGenerationProvider::new()
//!     .with_reply("How did that make you feel?")
//!     .with_error(GenerationError::network("connection reset"));
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{GenerationError, GenerationProvider, GenerationRequest};

/// One queued mock outcome.
#[derive(Debug)]
pub enum MockReply {
    /// Return this text.
    Text(String),
    /// Fail with this error.
    Error(GenerationError),
}

/// Mock provider with queued replies and request capture.
///
/// Replies are consumed in queue order; once the queue is empty every call
/// returns the fallback text, so long conversations don't need one queued
/// reply per turn.
#[derive(Clone, Default)]
pub struct MockGenerationProvider {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    fallback: Arc<Mutex<String>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockGenerationProvider {
    /// Creates a mock with an empty queue and a generic fallback reply.
    pub fn new() -> Self {
        let provider = Self::default();
        *provider.fallback.lock().expect("mock lock poisoned") =
            "Could you tell me more about that?".to_string();
        provider
    }

    /// Queues a successful reply.
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.replies
            .lock()
            .expect("mock lock poisoned")
            .push_back(MockReply::Text(text.into()));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: GenerationError) -> Self {
        self.replies
            .lock()
            .expect("mock lock poisoned")
            .push_back(MockReply::Error(error));
        self
    }

    /// Sets the text returned once the queue is empty.
    pub fn with_fallback(self, text: impl Into<String>) -> Self {
        *self.fallback.lock().expect("mock lock poisoned") = text.into();
        self
    }

    /// Requests captured so far.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().expect("mock lock poisoned").clone()
    }

    /// Number of calls made.
    pub fn call_count(&self) -> usize {
        self.requests.lock().expect("mock lock poisoned").len()
    }
}

#[async_trait]
impl GenerationProvider for MockGenerationProvider {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        self.requests
            .lock()
            .expect("mock lock poisoned")
            .push(request);

        let reply = self.replies.lock().expect("mock lock poisoned").pop_front();
        match reply {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Error(error)) => Err(error),
            None => Ok(self.fallback.lock().expect("mock lock poisoned").clone()),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
