//! HTTP DTOs for the interview API.
//!
//! These types decouple the HTTP surface from domain types, allowing
//! independent evolution.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::application::{SessionStart, TurnOutcome};
use crate::domain::experiment::{ExperimentDefinition, ParticipantField};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to start a new interview session.
#[derive(Debug, Clone, Deserialize)]
pub struct StartSessionRequest {
    pub participant_id: String,
    pub experiment_id: String,
    #[serde(default)]
    pub participant_info: BTreeMap<String, String>,
}

/// Request to send one participant message.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageRequest {
    pub message: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Response from starting a session.
#[derive(Debug, Clone, Serialize)]
pub struct StartSessionResponse {
    pub session_id: String,
    pub greeting: String,
    pub exchange_count: u32,
}

impl From<SessionStart> for StartSessionResponse {
    fn from(start: SessionStart) -> Self {
        Self {
            session_id: start.session_id.to_string(),
            greeting: start.greeting,
            exchange_count: start.exchange_count,
        }
    }
}

/// Response from processing one turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnResponse {
    pub response: String,
    pub exchange_count: u32,
    pub is_complete: bool,
    pub topics_covered: Vec<String>,
}

impl From<TurnOutcome> for TurnResponse {
    fn from(outcome: TurnOutcome) -> Self {
        Self {
            response: outcome.response_text,
            exchange_count: outcome.exchange_count,
            is_complete: outcome.is_complete,
            topics_covered: outcome.topics_covered,
        }
    }
}

/// Summary of one experiment for listing and detail endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentSummary {
    pub experiment_id: String,
    pub name: String,
    pub description: String,
    pub participant_info_fields: Vec<FieldSummary>,
}

/// One declared participant-info field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSummary {
    pub name: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl ExperimentSummary {
    /// Builds a summary from a definition and its catalog id.
    pub fn from_definition(experiment_id: &str, definition: &ExperimentDefinition) -> Self {
        Self {
            experiment_id: experiment_id.to_string(),
            name: definition.name.clone(),
            description: definition.description.clone(),
            participant_info_fields: definition
                .participant_info_fields
                .iter()
                .map(FieldSummary::from_field)
                .collect(),
        }
    }
}

impl FieldSummary {
    fn from_field(field: &ParticipantField) -> Self {
        Self {
            name: field.name.clone(),
            required: field.required,
            prompt: field.prompt.clone(),
        }
    }
}

/// Error body for every non-success response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    /// Creates an error body with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
