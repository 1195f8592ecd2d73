//! Message Repository Implementation
//!
//! PostgreSQL implementation of the MessageRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{AuthoredMessage, Message, MessageRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: Uuid,
    conversation_id: Uuid,
    sender_id: Uuid,
    message_text: String,
    sent_at: DateTime<Utc>,
    is_read: bool,
}

impl MessageRow {
    fn into_message(self) -> Message {
        Message {
            id: self.id,
            conversation_id: self.conversation_id,
            sender_id: self.sender_id,
            message_text: self.message_text,
            sent_at: self.sent_at,
            is_read: self.is_read,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AuthoredMessageRow {
    #[sqlx(flatten)]
    message: MessageRow,
    sender_name: String,
}

/// PostgreSQL message repository implementation.
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn append(
        &self,
        conversation_id: Uuid,
        sender_id: Uuid,
        text: &str,
    ) -> Result<Message, AppError> {
        if text.trim().is_empty() {
            return Err(AppError::Validation("message must not be blank".into()));
        }

        let draft = Message::new(conversation_id, sender_id, text);

        // The participant check and the insert are one statement.
        let inserted = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages (id, conversation_id, sender_id, message_text, sent_at, is_read)
            SELECT $1, c.id, $3, $4, $5, FALSE
            FROM conversations c
            WHERE c.id = $2 AND $3 IN (c.sender_id, c.receiver_id)
            RETURNING id, conversation_id, sender_id, message_text, sent_at, is_read
            "#,
        )
        .bind(draft.id)
        .bind(draft.conversation_id)
        .bind(draft.sender_id)
        .bind(&draft.message_text)
        .bind(draft.sent_at)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = inserted {
            return Ok(row.into_message());
        }

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM conversations WHERE id = $1)",
        )
        .bind(conversation_id)
        .fetch_one(&self.pool)
        .await?;

        if exists {
            Err(AppError::Forbidden(
                "sender is not a participant of this conversation".into(),
            ))
        } else {
            Err(AppError::NotFound(format!(
                "Conversation with id {} not found",
                conversation_id
            )))
        }
    }

    async fn list_by_conversation(
        &self,
        conversation_id: Uuid,
    ) -> Result<Vec<AuthoredMessage>, AppError> {
        let rows = sqlx::query_as::<_, AuthoredMessageRow>(
            r#"
            SELECT m.id, m.conversation_id, m.sender_id, m.message_text, m.sent_at, m.is_read,
                   u.name AS sender_name
            FROM messages m
            JOIN users u ON u.id = m.sender_id
            WHERE m.conversation_id = $1
            ORDER BY m.sent_at ASC, m.id ASC
            "#,
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| AuthoredMessage {
                message: row.message.into_message(),
                sender_name: row.sender_name,
            })
            .collect())
    }

    async fn unread_count(&self, user_id: Uuid, conversation_id: Uuid) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM messages
            WHERE conversation_id = $1
              AND sender_id <> $2
              AND is_read = FALSE
            "#,
        )
        .bind(conversation_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
