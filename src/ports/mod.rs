//! Ports - interfaces for external collaborators.
//!
//! Following hexagonal architecture, ports define the contracts between the
//! conversation engine and the outside world. Adapters implement these ports.
//!
//! - `GenerationProvider` - opaque "produce the next utterance" capability
//! - `SessionRegistry` - session lifecycle persistence
//! - `ConversationStore` - append-only turn and response logs
//! - `ExperimentCatalog` - read-only experiment definition lookup

mod conversation_store;
mod experiment_catalog;
mod generation;
mod session_registry;

pub use conversation_store::{ConversationStore, ExportMetadata, ResponseRecord, SessionExport};
pub use experiment_catalog::ExperimentCatalog;
pub use generation::{GenerationError, GenerationProvider, GenerationRequest, Message, MessageRole};
pub use session_registry::SessionRegistry;
