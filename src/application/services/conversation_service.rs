//! Conversation Service
//!
//! Opening conversations, viewing one as a participant and listing a user's
//! conversations with unread counts.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::services::ConversationResolver;
use crate::domain::{
    AuthoredMessage, Conversation, ConversationOverview, ConversationRepository,
    MessageRepository, SenderProfile, User, UserProfile, UserRepository,
};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;

/// Conversation service trait
#[async_trait]
pub trait ConversationService: Send + Sync {
    /// Open (or reuse) the conversation between `actor_id` and `receiver_id`.
    async fn create_conversation(
        &self,
        actor_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<ConversationDto, ConversationError>;

    async fn get_conversation(
        &self,
        actor_id: Uuid,
        conversation_id: Uuid,
    ) -> Result<ConversationDto, ConversationError>;

    /// Most recently active first.
    async fn list_conversations(
        &self,
        actor_id: Uuid,
    ) -> Result<Vec<ConversationSummaryDto>, ConversationError>;
}

/// A conversation as seen by one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationDto {
    pub id: Uuid,
    pub with_user: UserProfile,
}

impl ConversationDto {
    pub fn new(conversation: &Conversation, counterpart: &User) -> Self {
        Self {
            id: conversation.id,
            with_user: counterpart.profile(),
        }
    }
}

/// Latest message of a conversation, without its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastMessagePreview {
    pub id: Uuid,
    pub sender: SenderProfile,
    pub sent_at: DateTime<Utc>,
}

impl From<&AuthoredMessage> for LastMessagePreview {
    fn from(authored: &AuthoredMessage) -> Self {
        Self {
            id: authored.message.id,
            sender: authored.sender(),
            sent_at: authored.message.sent_at,
        }
    }
}

/// One entry of the conversation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationSummaryDto {
    pub id: Uuid,
    pub with_user: UserProfile,
    pub last_message: Option<LastMessagePreview>,
    pub unread_count: i64,
}

impl ConversationSummaryDto {
    fn from_overview(overview: ConversationOverview, unread_count: i64) -> Self {
        Self {
            id: overview.conversation.id,
            last_message: overview.last_message.as_ref().map(LastMessagePreview::from),
            with_user: overview.counterpart,
            unread_count,
        }
    }
}

/// Conversation service errors
#[derive(Debug, thiserror::Error)]
pub enum ConversationError {
    #[error("Conversation not found")]
    NotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Not a participant of this conversation")]
    Unauthorized,

    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AppError> for ConversationError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::NotFound(_) => ConversationError::NotFound,
            AppError::Forbidden(_) => ConversationError::Unauthorized,
            AppError::Validation(msg) => ConversationError::Validation(msg),
            e => ConversationError::Internal(e.to_string()),
        }
    }
}

impl From<ConversationError> for AppError {
    fn from(err: ConversationError) -> Self {
        match err {
            ConversationError::NotFound => AppError::NotFound("Conversation not found".into()),
            ConversationError::UserNotFound => AppError::NotFound("User not found".into()),
            ConversationError::Unauthorized => {
                AppError::Forbidden("Not a participant of this conversation".into())
            }
            ConversationError::Validation(msg) => AppError::Validation(msg),
            ConversationError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// ConversationService implementation
pub struct ConversationServiceImpl<U, C, M>
where
    U: UserRepository,
    C: ConversationRepository,
    M: MessageRepository,
{
    user_repo: Arc<U>,
    conversation_repo: Arc<C>,
    message_repo: Arc<M>,
}

impl<U, C, M> ConversationServiceImpl<U, C, M>
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

    async fn require_user(&self, user_id: Uuid) -> Result<User, ConversationError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(ConversationError::UserNotFound)
    }
}

#[async_trait]
impl<U, C, M> ConversationService for ConversationServiceImpl<U, C, M>
where
    U: UserRepository + 'static,
    C: ConversationRepository + 'static,
    M: MessageRepository + 'static,
{
    async fn create_conversation(
        &self,
        actor_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<ConversationDto, ConversationError> {
        if actor_id == receiver_id {
            return Err(ConversationError::Validation(
                "cannot start a conversation with yourself".into(),
            ));
        }

        self.require_user(actor_id).await?;
        let receiver = self.require_user(receiver_id).await?;

        let resolved =
            ConversationResolver::find_or_create(&*self.conversation_repo, actor_id, receiver_id)
                .await?;
        if resolved.created {
            metrics::record_conversation_created();
            tracing::info!(
                conversation_id = %resolved.conversation.id,
                sender_id = %actor_id,
                receiver_id = %receiver_id,
                "conversation created"
            );
        }

        Ok(ConversationDto::new(&resolved.conversation, &receiver))
    }

    async fn get_conversation(
        &self,
        actor_id: Uuid,
        conversation_id: Uuid,
    ) -> Result<ConversationDto, ConversationError> {
        let conversation = self.conversation_repo.get_by_id(conversation_id).await?;
        let counterpart_id = ConversationResolver::authorize(&conversation, actor_id)?;
        // A deleted counterpart takes the conversation with it.
        let counterpart = self
            .user_repo
            .find_by_id(counterpart_id)
            .await?
            .ok_or(ConversationError::NotFound)?;

        Ok(ConversationDto::new(&conversation, &counterpart))
    }

    async fn list_conversations(
        &self,
        actor_id: Uuid,
    ) -> Result<Vec<ConversationSummaryDto>, ConversationError> {
        let overviews = self.conversation_repo.list_by_user(actor_id).await?;

        let unread_counts = try_join_all(overviews.iter().map(|overview| {
            self.message_repo
                .unread_count(actor_id, overview.conversation.id)
        }))
        .await?;

        tracing::debug!(user_id = %actor_id, count = overviews.len(), "listed conversations");

        Ok(overviews
            .into_iter()
            .zip(unread_counts)
            .map(|(overview, unread)| ConversationSummaryDto::from_overview(overview, unread))
            .collect())
    }
}
