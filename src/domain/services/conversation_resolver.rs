//! Conversation lookup and access rules.

use uuid::Uuid;

use crate::domain::entities::{Conversation, ConversationRepository};
use crate::shared::error::AppError;

/// Outcome of [`ConversationResolver::find_or_create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub conversation: Conversation,
    /// The pair had no conversation when we looked. A concurrent caller may
    /// still have inserted the row we ended up returning.
    pub created: bool,
}

/// Domain service for deriving and guarding direct conversations.
pub struct ConversationResolver;

impl ConversationResolver {
    /// Return the conversation between `a` and `b`, creating it on first use.
    ///
    /// No lock is taken here. Two racing callers may both miss the lookup;
    /// the repository's pair uniqueness makes the second `create` return
    /// the first caller's row.
    pub async fn find_or_create(
        repo: &dyn ConversationRepository,
        a: Uuid,
        b: Uuid,
    ) -> Result<Resolved, AppError> {
        if a == b {
            return Err(AppError::Validation(
                "a conversation needs two different users".into(),
            ));
        }

        if let Some(conversation) = repo.find_by_participants(a, b).await? {
            return Ok(Resolved {
                conversation,
                created: false,
            });
        }

        let conversation = repo.create(a, b).await?;
        Ok(Resolved {
            conversation,
            created: true,
        })
    }

    /// Check that `user_id` takes part in `conversation` and return the
    /// other participant.
    pub fn authorize(conversation: &Conversation, user_id: Uuid) -> Result<Uuid, AppError> {
        conversation.counterpart_of(user_id).ok_or_else(|| {
            AppError::Forbidden("you are not a participant of this conversation".into())
        })
    }
}
