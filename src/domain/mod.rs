//! Domain layer - entities, value objects, and conversation policy.

pub mod conversation;
pub mod experiment;
pub mod foundation;
pub mod session;
