//! Message entity and repository trait.
//!
//! Maps to the `messages` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::SenderProfile;
use crate::shared::error::AppError;

/// A message posted into a conversation. Immutable once appended.
///
/// Ids are UUIDv7 so that `(sent_at, id)` gives a total order even when two
/// messages share a timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub message_text: String,
    pub sent_at: DateTime<Utc>,
    #[serde(default)]
    pub is_read: bool,
}

impl Message {
    pub fn new(conversation_id: Uuid, sender_id: Uuid, message_text: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            conversation_id,
            sender_id,
            message_text: message_text.into(),
            sent_at: Utc::now(),
            is_read: false,
        }
    }

    /// Whether `user_id` still has to read this message.
    pub fn is_unread_for(&self, user_id: Uuid) -> bool {
        !self.is_read && self.sender_id != user_id
    }

    /// Key for the canonical listing order.
    pub fn ordering_key(&self) -> (DateTime<Utc>, Uuid) {
        (self.sent_at, self.id)
    }
}

/// Message joined with its author's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthoredMessage {
    pub message: Message,
    pub sender_name: String,
}

impl AuthoredMessage {
    pub fn sender(&self) -> SenderProfile {
        SenderProfile {
            id: self.message.sender_id,
            name: self.sender_name.clone(),
        }
    }
}

/// Message ledger contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Append a message. `Validation` on blank text, `NotFound` when the
    /// conversation is unknown, `Forbidden` when the sender is not a participant.
    async fn append(
        &self,
        conversation_id: Uuid,
        sender_id: Uuid,
        text: &str,
    ) -> Result<Message, AppError>;

    /// Messages oldest first.
    async fn list_by_conversation(
        &self,
        conversation_id: Uuid,
    ) -> Result<Vec<AuthoredMessage>, AppError>;

    /// Unread messages in the conversation written by the other participant.
    async fn unread_count(&self, user_id: Uuid, conversation_id: Uuid) -> Result<i64, AppError>;
}
