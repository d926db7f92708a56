use crate::{
    types::{
        AppError, ChatRequest, ChatResponse, Message, RejectReason, Result, StatusResponse,
        TurnOutcome,
    },
    AppState,
};
use axum::{extract::State, Json};
use std::sync::Arc;

/// Submit a message to the delegation hub
///
/// Runs the whole turn before responding. The turn keeps running if the
/// client disconnects. A routing failure is reported in-band (outcome
/// `failed`) rather than as an HTTP error.
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Turn completed", body = ChatResponse),
        (status = 400, description = "Empty message"),
        (status = 409, description = "A turn is already in progress")
    ),
    tag = "chat"
)]
pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    if payload.message.trim().is_empty() {
        return Err(AppError::InvalidInput("message must not be empty".to_string()));
    }

    let response = Arc::clone(&state.controller)
        .submit_detached(payload.message)
        .await?;
    match response.outcome {
        TurnOutcome::Rejected {
            reason: RejectReason::Busy,
        } => Err(AppError::Busy),
        TurnOutcome::Rejected {
            reason: RejectReason::Empty,
        } => Err(AppError::InvalidInput("message must not be empty".to_string())),
        _ => Ok(Json(response)),
    }
}

/// Full transcript, oldest first
#[utoipa::path(
    get,
    path = "/api/messages",
    responses(
        (status = 200, description = "Transcript", body = Vec<Message>)
    ),
    tag = "chat"
)]
pub async fn get_messages(State(state): State<AppState>) -> Json<Vec<Message>> {
    Json(state.controller.messages())
}

/// Processing flag, phase, highlighted role, and error banner
#[utoipa::path(
    get,
    path = "/api/status",
    responses(
        (status = 200, description = "Hub status", body = StatusResponse)
    ),
    tag = "chat"
)]
pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(state.controller.status_response())
}
