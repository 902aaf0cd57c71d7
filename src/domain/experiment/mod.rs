//! Experiment definitions - immutable research-study configuration.

mod definition;
mod exit_rules;

pub use definition::{
    ConversationGuidelines, DefinitionError, ExperimentDefinition, FollowUpCategory,
    InitialQuestion, ParticipantField,
};
pub use exit_rules::ExitRules;
