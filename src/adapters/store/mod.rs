//! Conversation store adapters.
//!
//! The in-memory store is the default; the JSONL store persists each
//! session's logs as newline-delimited JSON files for durable exports.

mod in_memory;
mod jsonl;

pub use in_memory::InMemoryConversationStore;
pub use jsonl::JsonlConversationStore;
