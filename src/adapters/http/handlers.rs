//! HTTP handlers for the interview API.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::Interviewer;
use crate::domain::foundation::{EngineError, SessionId};

use super::dto::{
    ErrorResponse, ExperimentSummary, MessageRequest, StartSessionRequest, StartSessionResponse,
    TurnResponse,
};

/// Shared handler state.
#[derive(Clone)]
pub struct ApiState {
    pub interviewer: Arc<Interviewer>,
}

/// GET /health - liveness probe.
pub async fn health() -> Response {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" }))).into_response()
}

/// GET /api/experiments - list loaded experiments.
pub async fn list_experiments(State(state): State<ApiState>) -> Response {
    let summaries: Vec<ExperimentSummary> = state
        .interviewer
        .list_experiments()
        .iter()
        .filter_map(|id| {
            state
                .interviewer
                .get_experiment(id)
                .ok()
                .map(|definition| ExperimentSummary::from_definition(id, &definition))
        })
        .collect();

    (StatusCode::OK, Json(summaries)).into_response()
}

/// GET /api/experiments/:id - one experiment's details.
pub async fn get_experiment(
    State(state): State<ApiState>,
    Path(experiment_id): Path<String>,
) -> Response {
    match state.interviewer.get_experiment(&experiment_id) {
        Ok(definition) => (
            StatusCode::OK,
            Json(ExperimentSummary::from_definition(&experiment_id, &definition)),
        )
            .into_response(),
        Err(e) => engine_error_response(e),
    }
}

/// POST /api/sessions - start a new interview session.
pub async fn start_session(
    State(state): State<ApiState>,
    Json(req): Json<StartSessionRequest>,
) -> Response {
    match state
        .interviewer
        .start(&req.participant_id, &req.experiment_id, req.participant_info)
        .await
    {
        Ok(start) => {
            let response: StartSessionResponse = start.into();
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => engine_error_response(e),
    }
}

/// POST /api/sessions/:id/messages - process one participant message.
pub async fn send_message(
    State(state): State<ApiState>,
    Path(session_id): Path<String>,
    Json(req): Json<MessageRequest>,
) -> Response {
    let session_id = match session_id.parse::<SessionId>() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Invalid session ID")),
            )
                .into_response()
        }
    };

    match state.interviewer.process(&session_id, &req.message).await {
        Ok(outcome) => {
            let response: TurnResponse = outcome.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => engine_error_response(e),
    }
}

/// GET /api/sessions/:id/export - snapshot of one session's conversation.
pub async fn export_session(
    State(state): State<ApiState>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match session_id.parse::<SessionId>() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Invalid session ID")),
            )
                .into_response()
        }
    };

    match state.interviewer.export(&session_id).await {
        Ok(export) => (StatusCode::OK, Json(export)).into_response(),
        Err(e) => engine_error_response(e),
    }
}

/// Maps engine errors onto HTTP statuses: validation errors are the caller's
/// fault, unknown ids are 404, everything else is opaque.
fn engine_error_response(error: EngineError) -> Response {
    let status = match &error {
        EngineError::MissingParticipantFields { .. } => StatusCode::BAD_REQUEST,
        EngineError::ExperimentNotFound(_) | EngineError::SessionNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        EngineError::Storage(_) | EngineError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let body = if status == StatusCode::INTERNAL_SERVER_ERROR {
        ErrorResponse::new("internal error")
    } else {
        ErrorResponse::new(error.to_string())
    };

    (status, Json(body)).into_response()
}
