//! Message Handlers

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::application::dto::request::SendMessageRequest;
use crate::application::services::{AuthUser, MessageDto, SentMessageDto};
use crate::presentation::http::extractors::{PathParam, ValidatedJson};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Send a direct message
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<SentMessageDto>), AppError> {
    let sent = state
        .messages
        .send_message(auth.user_id, body.user_id, &body.message)
        .await?;

    Ok((StatusCode::CREATED, Json(sent)))
}

/// Message history of a conversation
pub async fn list_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(conversation_id): PathParam<Uuid>,
) -> Result<Json<Vec<MessageDto>>, AppError> {
    let messages = state
        .messages
        .list_messages(auth.user_id, conversation_id)
        .await?;

    Ok(Json(messages))
}
