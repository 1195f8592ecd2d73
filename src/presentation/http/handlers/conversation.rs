//! Conversation Handlers

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::application::dto::request::CreateConversationRequest;
use crate::application::services::{AuthUser, ConversationDto, ConversationSummaryDto};
use crate::presentation::http::extractors::{PathParam, ValidatedJson};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Open the conversation with another user, or return the existing one
pub async fn create_conversation(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<CreateConversationRequest>,
) -> Result<(StatusCode, Json<ConversationDto>), AppError> {
    let conversation = state
        .conversations
        .create_conversation(auth.user_id, body.user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(conversation)))
}

/// List the caller's conversations
pub async fn list_conversations(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<ConversationSummaryDto>>, AppError> {
    let conversations = state.conversations.list_conversations(auth.user_id).await?;

    Ok(Json(conversations))
}

/// View a single conversation
pub async fn get_conversation(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(conversation_id): PathParam<Uuid>,
) -> Result<Json<ConversationDto>, AppError> {
    let conversation = state
        .conversations
        .get_conversation(auth.user_id, conversation_id)
        .await?;

    Ok(Json(conversation))
}
