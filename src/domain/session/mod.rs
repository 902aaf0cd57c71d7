//! Session - one participant's run through one experiment.

mod record;

pub use record::{Session, SessionPatch};
