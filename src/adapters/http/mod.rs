//! HTTP adapter - thin axum front-end over the orchestrator.
//!
//! Every endpoint delegates to the [`Interviewer`](crate::application::Interviewer)
//! façade; no conversation policy lives here.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ErrorResponse, ExperimentSummary, MessageRequest, StartSessionRequest, StartSessionResponse,
    TurnResponse,
};
pub use routes::api_routes;
