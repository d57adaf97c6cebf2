//! Chat routes: the browser's only path to the completion API.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::dashboard::ChatTurn;
use crate::error::ApiError;
use crate::services::chat::{ChatError, ChatExchange};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MessageBody {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub transcript: Vec<ChatTurn>,
}

/// `GET /api/chat`: the transcript so far.
pub async fn get_transcript(State(state): State<AppState>) -> Json<TranscriptResponse> {
    let transcript = state.dashboard.read().await.state().transcript.clone();
    Json(TranscriptResponse { transcript })
}

/// `POST /api/chat`: relay one message and return the reply.
pub async fn post_message(
    State(state): State<AppState>,
    Json(body): Json<MessageBody>,
) -> Result<Json<ChatExchange>, ApiError> {
    state
        .chat
        .send(&state.dashboard, &state.shutdown, &body.content)
        .await
        .map(Json)
        .map_err(chat_error)
}

pub(crate) fn chat_error(err: ChatError) -> ApiError {
    let status = match &err {
        ChatError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ChatError::Llm(_) | ChatError::EmptyReply => StatusCode::BAD_GATEWAY,
        ChatError::Cancelled | ChatError::Dashboard(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    ApiError::new(status, &err)
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
