//! Message Service
//!
//! Sending a direct message (opening the conversation on first contact) and
//! reading a conversation's history.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::conversation_service::ConversationDto;
use crate::domain::services::ConversationResolver;
use crate::domain::{
    AuthoredMessage, ConversationRepository, MessageRepository, SenderProfile, User,
    UserRepository,
};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;

/// Message service trait
#[async_trait]
pub trait MessageService: Send + Sync {
    /// Send `text` from `actor_id` to `receiver_id`.
    async fn send_message(
        &self,
        actor_id: Uuid,
        receiver_id: Uuid,
        text: &str,
    ) -> Result<SentMessageDto, MessageError>;

    /// History of a conversation, oldest first.
    async fn list_messages(
        &self,
        actor_id: Uuid,
        conversation_id: Uuid,
    ) -> Result<Vec<MessageDto>, MessageError>;
}

/// Result of sending a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentMessageDto {
    pub id: Uuid,
    pub message: String,
    pub sender: SenderProfile,
    pub sent_at: DateTime<Utc>,
    pub conversation: ConversationDto,
}

/// One message of a conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageDto {
    pub id: Uuid,
    pub message: String,
    pub sender: SenderProfile,
    pub sent_at: DateTime<Utc>,
    pub is_read: bool,
}

impl From<AuthoredMessage> for MessageDto {
    fn from(authored: AuthoredMessage) -> Self {
        let sender = authored.sender();
        Self {
            id: authored.message.id,
            message: authored.message.message_text,
            sender,
            sent_at: authored.message.sent_at,
            is_read: authored.message.is_read,
        }
    }
}

/// Message service errors
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("Conversation not found")]
    ConversationNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Not a participant of this conversation")]
    Unauthorized,

    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AppError> for MessageError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::NotFound(_) => MessageError::ConversationNotFound,
            AppError::Forbidden(_) => MessageError::Unauthorized,
            AppError::Validation(msg) => MessageError::Validation(msg),
            e => MessageError::Internal(e.to_string()),
        }
    }
}

impl From<MessageError> for AppError {
    fn from(err: MessageError) -> Self {
        match err {
            MessageError::ConversationNotFound => {
                AppError::NotFound("Conversation not found".into())
            }
            MessageError::UserNotFound => AppError::NotFound("User not found".into()),
            MessageError::Unauthorized => {
                AppError::Forbidden("Not a participant of this conversation".into())
            }
            MessageError::Validation(msg) => AppError::Validation(msg),
            MessageError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// MessageService implementation
pub struct MessageServiceImpl<U, C, M>
where
    U: UserRepository,
    C: ConversationRepository,
    M: MessageRepository,
{
    user_repo: Arc<U>,
    conversation_repo: Arc<C>,
    message_repo: Arc<M>,
}

impl<U, C, M> MessageServiceImpl<U, C, M>
where
    U: UserRepository,
    C: ConversationRepository,
    M: MessageRepository,
{
    pub fn new(user_repo: Arc<U>, conversation_repo: Arc<C>, message_repo: Arc<M>) -> Self {
        Self {
            user_repo,
            conversation_repo,
            message_repo,
        }
    }

    async fn require_user(&self, user_id: Uuid) -> Result<User, MessageError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(MessageError::UserNotFound)
    }
}

#[async_trait]
impl<U, C, M> MessageService for MessageServiceImpl<U, C, M>
where
    U: UserRepository + 'static,
    C: ConversationRepository + 'static,
    M: MessageRepository + 'static,
{
    async fn send_message(
        &self,
        actor_id: Uuid,
        receiver_id: Uuid,
        text: &str,
    ) -> Result<SentMessageDto, MessageError> {
        if text.trim().is_empty() {
            return Err(MessageError::Validation("message must not be blank".into()));
        }
        if actor_id == receiver_id {
            return Err(MessageError::Validation(
                "cannot send a message to yourself".into(),
            ));
        }

        let sender = self.require_user(actor_id).await?;
        let receiver = self.require_user(receiver_id).await?;

        let resolved =
            ConversationResolver::find_or_create(&*self.conversation_repo, sender.id, receiver.id)
                .await?;
        if resolved.created {
            metrics::record_conversation_created();
            tracing::info!(
                conversation_id = %resolved.conversation.id,
                sender_id = %sender.id,
                receiver_id = %receiver.id,
                "conversation created on first message"
            );
        }

        let message = self
            .message_repo
            .append(resolved.conversation.id, sender.id, text)
            .await?;
        metrics::record_message_sent();
        tracing::debug!(
            message_id = %message.id,
            conversation_id = %message.conversation_id,
            "message appended"
        );

        Ok(SentMessageDto {
            id: message.id,
            message: message.message_text,
            sender: sender.sender(),
            sent_at: message.sent_at,
            conversation: ConversationDto::new(&resolved.conversation, &receiver),
        })
    }

    async fn list_messages(
        &self,
        actor_id: Uuid,
        conversation_id: Uuid,
    ) -> Result<Vec<MessageDto>, MessageError> {
        let conversation = self.conversation_repo.get_by_id(conversation_id).await?;
        let counterpart_id = ConversationResolver::authorize(&conversation, actor_id)?;
        if self.user_repo.find_by_id(counterpart_id).await?.is_none() {
            return Err(MessageError::ConversationNotFound);
        }

        let messages = self
            .message_repo
            .list_by_conversation(conversation.id)
            .await?;

        Ok(messages.into_iter().map(MessageDto::from).collect())
    }
}
