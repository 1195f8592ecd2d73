//! Conversation entity and repository trait.
//!
//! Maps to the `conversations` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::message::AuthoredMessage;
use super::user::UserProfile;
use crate::domain::value_objects::ParticipantPair;
use crate::shared::error::AppError;

/// A direct conversation between exactly two users.
///
/// `sender_id` and `receiver_id` only record who started it; access rules
/// treat both participants the same. At most one row exists per unordered
/// pair and rows are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// Returns `None` when both ids name the same user.
    pub fn new(sender_id: Uuid, receiver_id: Uuid) -> Option<Self> {
        if sender_id == receiver_id {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4(),
            sender_id,
            receiver_id,
            created_at: Utc::now(),
        })
    }

    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.sender_id == user_id || self.receiver_id == user_id
    }

    /// The other participant as seen from `user_id`.
    pub fn counterpart_of(&self, user_id: Uuid) -> Option<Uuid> {
        if user_id == self.sender_id {
            Some(self.receiver_id)
        } else if user_id == self.receiver_id {
            Some(self.sender_id)
        } else {
            None
        }
    }

    pub fn participants(&self) -> Option<ParticipantPair> {
        ParticipantPair::new(self.sender_id, self.receiver_id)
    }
}

/// One row of a user's conversation list.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationOverview {
    pub conversation: Conversation,
    pub counterpart: UserProfile,
    pub last_message: Option<AuthoredMessage>,
}

impl ConversationOverview {
    /// Timestamp used to order the list: latest message, else creation.
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_message
            .as_ref()
            .map(|m| m.message.sent_at)
            .unwrap_or(self.conversation.created_at)
    }
}

/// Conversation directory contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Insert the conversation for `{a, b}` or return the one that already
    /// exists. Rejects `a == b` with `Validation`.
    async fn create(&self, a: Uuid, b: Uuid) -> Result<Conversation, AppError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Conversation, AppError>;

    /// Symmetric lookup, `None` when the users never talked.
    async fn find_by_participants(&self, a: Uuid, b: Uuid)
        -> Result<Option<Conversation>, AppError>;

    /// Every conversation of `user_id`, most recently active first.
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<ConversationOverview>, AppError>;
}
