//! HTTP routes for the interview API.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::application::Interviewer;

use super::handlers::{
    self, export_session, get_experiment, health, list_experiments, send_message, start_session,
};

/// Creates the API router with all endpoints.
pub fn api_routes(interviewer: Arc<Interviewer>) -> Router {
    let state = handlers::ApiState { interviewer };

    Router::new()
        .route("/health", get(health))
        .route("/api/experiments", get(list_experiments))
        .route("/api/experiments/:id", get(get_experiment))
        .route("/api/sessions", post(start_session))
        .route("/api/sessions/:id/messages", post(send_message))
        .route("/api/sessions/:id/export", get(export_session))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
