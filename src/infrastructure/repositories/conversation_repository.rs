//! Conversation Repository Implementation
//!
//! PostgreSQL implementation of the ConversationRepository trait.
//!
//! Pair uniqueness is enforced by the `conversations_pair_key` expression
//! index on `(LEAST(sender_id, receiver_id), GREATEST(sender_id, receiver_id))`,
//! so `create` is idempotent without any application-level locking.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{
    AuthoredMessage, Conversation, ConversationOverview, ConversationRepository, Message,
    UserProfile,
};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct ConversationRow {
    id: Uuid,
    sender_id: Uuid,
    receiver_id: Uuid,
    created_at: DateTime<Utc>,
}

impl ConversationRow {
    fn into_conversation(self) -> Conversation {
        Conversation {
            id: self.id,
            sender_id: self.sender_id,
            receiver_id: self.receiver_id,
            created_at: self.created_at,
        }
    }
}

/// One conversation joined with its counterpart and latest message.
#[derive(Debug, sqlx::FromRow)]
struct OverviewRow {
    id: Uuid,
    sender_id: Uuid,
    receiver_id: Uuid,
    created_at: DateTime<Utc>,
    counterpart_id: Uuid,
    counterpart_name: String,
    counterpart_photo_url: Option<String>,
    last_message_id: Option<Uuid>,
    last_sender_id: Option<Uuid>,
    last_sender_name: Option<String>,
    last_message_text: Option<String>,
    last_sent_at: Option<DateTime<Utc>>,
    last_is_read: Option<bool>,
}

impl OverviewRow {
    fn into_overview(self) -> ConversationOverview {
        let last_message = match (
            self.last_message_id,
            self.last_sender_id,
            self.last_sender_name,
            self.last_message_text,
            self.last_sent_at,
        ) {
            (Some(id), Some(sender_id), Some(sender_name), Some(text), Some(sent_at)) => {
                Some(AuthoredMessage {
                    message: Message {
                        id,
                        conversation_id: self.id,
                        sender_id,
                        message_text: text,
                        sent_at,
                        is_read: self.last_is_read.unwrap_or(false),
                    },
                    sender_name,
                })
            }
            _ => None,
        };

        ConversationOverview {
            conversation: Conversation {
                id: self.id,
                sender_id: self.sender_id,
                receiver_id: self.receiver_id,
                created_at: self.created_at,
            },
            counterpart: UserProfile {
                id: self.counterpart_id,
                name: self.counterpart_name,
                photo_url: self.counterpart_photo_url,
            },
            last_message,
        }
    }
}

/// PostgreSQL conversation repository implementation.
#[derive(Clone)]
pub struct PgConversationRepository {
    pool: PgPool,
}

impl PgConversationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationRepository for PgConversationRepository {
    async fn create(&self, a: Uuid, b: Uuid) -> Result<Conversation, AppError> {
        let candidate = Conversation::new(a, b).ok_or_else(|| {
            AppError::Validation("a conversation needs two different users".into())
        })?;

        let inserted = sqlx::query_as::<_, ConversationRow>(
            r#"
            INSERT INTO conversations (id, sender_id, receiver_id, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT DO NOTHING
            RETURNING id, sender_id, receiver_id, created_at
            "#,
        )
        .bind(candidate.id)
        .bind(candidate.sender_id)
        .bind(candidate.receiver_id)
        .bind(candidate.created_at)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = inserted {
            return Ok(row.into_conversation());
        }

        // Lost the race: a separate statement sees the winner's committed row.
        tracing::debug!(%a, %b, "conversation insert conflicted, reading existing row");
        self.find_by_participants(a, b).await?.ok_or_else(|| {
            AppError::Internal(format!(
                "conversation insert for {a} and {b} conflicted but no row was found"
            ))
        })
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Conversation, AppError> {
        let row = sqlx::query_as::<_, ConversationRow>(
            r#"
            SELECT id, sender_id, receiver_id, created_at
            FROM conversations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Conversation with id {} not found", id)))?;

        Ok(row.into_conversation())
    }

    async fn find_by_participants(
        &self,
        a: Uuid,
        b: Uuid,
    ) -> Result<Option<Conversation>, AppError> {
        let row = sqlx::query_as::<_, ConversationRow>(
            r#"
            SELECT id, sender_id, receiver_id, created_at
            FROM conversations
            WHERE LEAST(sender_id, receiver_id) = LEAST($1::uuid, $2::uuid)
              AND GREATEST(sender_id, receiver_id) = GREATEST($1::uuid, $2::uuid)
            "#,
        )
        .bind(a)
        .bind(b)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ConversationRow::into_conversation))
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<ConversationOverview>, AppError> {
        let rows = sqlx::query_as::<_, OverviewRow>(
            r#"
            SELECT c.id, c.sender_id, c.receiver_id, c.created_at,
                   u.id AS counterpart_id,
                   u.name AS counterpart_name,
                   u.photo_url AS counterpart_photo_url,
                   lm.id AS last_message_id,
                   lm.sender_id AS last_sender_id,
                   lm.sender_name AS last_sender_name,
                   lm.message_text AS last_message_text,
                   lm.sent_at AS last_sent_at,
                   lm.is_read AS last_is_read
            FROM conversations c
            JOIN users u
              ON u.id = CASE WHEN c.sender_id = $1 THEN c.receiver_id ELSE c.sender_id END
             AND u.deleted_at IS NULL
            LEFT JOIN LATERAL (
                SELECT m.id, m.sender_id, m.message_text, m.sent_at, m.is_read,
                       su.name AS sender_name
                FROM messages m
                JOIN users su ON su.id = m.sender_id
                WHERE m.conversation_id = c.id
                ORDER BY m.sent_at DESC, m.id DESC
                LIMIT 1
            ) lm ON TRUE
            WHERE c.sender_id = $1 OR c.receiver_id = $1
            ORDER BY COALESCE(lm.sent_at, c.created_at) DESC, c.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(OverviewRow::into_overview).collect())
    }
}
