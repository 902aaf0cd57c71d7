//! Foundation - shared value objects and error types.

mod errors;
mod ids;
mod timestamp;

pub use errors::EngineError;
pub use ids::SessionId;
pub use timestamp::Timestamp;
