//! In-Memory Store
//!
//! Implements all three repository traits over process-local maps guarded by
//! a single `parking_lot::RwLock`. Used by tests and by `database.url = ""`
//! development runs. Every operation takes the lock once, so find-or-create
//! of a conversation is atomic here without relying on a unique index.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::domain::{
    AuthoredMessage, Conversation, ConversationOverview, ConversationRepository, Message,
    MessageRepository, ParticipantPair, User, UserFilter, UserRepository,
};
use crate::shared::error::AppError;
use crate::shared::pagination::PageRequest;

#[derive(Default)]
struct State {
    users: HashMap<Uuid, User>,
    conversations: HashMap<Uuid, Conversation>,
    pairs: HashMap<ParticipantPair, Uuid>,
    messages: HashMap<Uuid, Vec<Message>>,
}

impl State {
    fn active_user(&self, id: Uuid) -> Option<&User> {
        self.users.get(&id).filter(|u| !u.is_deleted())
    }

    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.users.values().any(|u| {
            !u.is_deleted() && Some(u.id) != except && u.email.eq_ignore_ascii_case(email)
        })
    }

    fn sender_name(&self, sender_id: Uuid) -> String {
        self.users
            .get(&sender_id)
            .map(|u| u.name.clone())
            .unwrap_or_default()
    }

    fn authored(&self, message: &Message) -> AuthoredMessage {
        AuthoredMessage {
            message: message.clone(),
            sender_name: self.sender_name(message.sender_id),
        }
    }
}

/// Shared in-process backend for every repository trait.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.state.read().active_user(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let state = self.state.read();
        Ok(state
            .users
            .values()
            .find(|u| !u.is_deleted() && u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        Ok(self.state.read().email_taken(email, None))
    }

    async fn create(&self, user: &User) -> Result<User, AppError> {
        let mut state = self.state.write();
        if state.email_taken(&user.email, None) {
            return Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }
        if state.users.contains_key(&user.id) {
            return Err(AppError::Conflict(format!("User with id {} already exists", user.id)));
        }
        state.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn update(&self, user: &User) -> Result<User, AppError> {
        let mut state = self.state.write();
        if state.active_user(user.id).is_none() {
            return Err(AppError::NotFound(format!("User with id {} not found", user.id)));
        }
        if state.email_taken(&user.email, Some(user.id)) {
            return Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        let mut updated = user.clone();
        updated.updated_at = Utc::now();
        updated.deleted_at = None;
        state.users.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut state = self.state.write();
        match state.users.get_mut(&id).filter(|u| !u.is_deleted()) {
            Some(user) => {
                let now = Utc::now();
                user.deleted_at = Some(now);
                user.updated_at = now;
                Ok(())
            }
            None => Err(AppError::NotFound(format!("User with id {} not found", id))),
        }
    }

    async fn list(
        &self,
        filter: &UserFilter,
        page: &PageRequest,
    ) -> Result<(Vec<User>, i64), AppError> {
        let needle = filter.term().map(str::to_lowercase);
        let state = self.state.read();

        let mut matches: Vec<&User> = state
            .users
            .values()
            .filter(|u| !u.is_deleted())
            .filter(|u| match &needle {
                Some(n) => u.name.to_lowercase().contains(n.as_str()),
                None => true,
            })
            .collect();
        matches.sort_by_key(|u| (u.created_at, u.id));

        let total = matches.len() as i64;
        let items = matches
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect();

        Ok((items, total))
    }
}

#[async_trait]
impl ConversationRepository for InMemoryStore {
    async fn create(&self, a: Uuid, b: Uuid) -> Result<Conversation, AppError> {
        let pair = ParticipantPair::new(a, b).ok_or_else(|| {
            AppError::Validation("a conversation needs two different users".into())
        })?;

        let mut state = self.state.write();
        if let Some(existing) = state
            .pairs
            .get(&pair)
            .and_then(|id| state.conversations.get(id))
        {
            return Ok(existing.clone());
        }

        let conversation = Conversation::new(a, b).ok_or_else(|| {
            AppError::Validation("a conversation needs two different users".into())
        })?;
        state.pairs.insert(pair, conversation.id);
        state
            .conversations
            .insert(conversation.id, conversation.clone());
        Ok(conversation)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Conversation, AppError> {
        self.state
            .read()
            .conversations
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Conversation with id {} not found", id)))
    }

    async fn find_by_participants(
        &self,
        a: Uuid,
        b: Uuid,
    ) -> Result<Option<Conversation>, AppError> {
        let Some(pair) = ParticipantPair::new(a, b) else {
            return Ok(None);
        };
        let state = self.state.read();
        Ok(state
            .pairs
            .get(&pair)
            .and_then(|id| state.conversations.get(id))
            .cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<ConversationOverview>, AppError> {
        let state = self.state.read();

        let mut overviews: Vec<ConversationOverview> = state
            .conversations
            .values()
            .filter_map(|conversation| {
                let counterpart_id = conversation.counterpart_of(user_id)?;
                let counterpart = state.active_user(counterpart_id)?.profile();
                let last_message = state
                    .messages
                    .get(&conversation.id)
                    .and_then(|messages| messages.iter().max_by_key(|m| m.ordering_key()))
                    .map(|m| state.authored(m));

                Some(ConversationOverview {
                    conversation: conversation.clone(),
                    counterpart,
                    last_message,
                })
            })
            .collect();

        overviews.sort_by(|x, y| {
            y.last_activity()
                .cmp(&x.last_activity())
                .then_with(|| y.conversation.id.cmp(&x.conversation.id))
        });

        Ok(overviews)
    }
}

#[async_trait]
impl MessageRepository for InMemoryStore {
    async fn append(
        &self,
        conversation_id: Uuid,
        sender_id: Uuid,
        text: &str,
    ) -> Result<Message, AppError> {
        if text.trim().is_empty() {
            return Err(AppError::Validation("message must not be blank".into()));
        }

        let mut state = self.state.write();
        let conversation = state.conversations.get(&conversation_id).ok_or_else(|| {
            AppError::NotFound(format!("Conversation with id {} not found", conversation_id))
        })?;
        if !conversation.is_participant(sender_id) {
            return Err(AppError::Forbidden(
                "sender is not a participant of this conversation".into(),
            ));
        }

        let message = Message::new(conversation_id, sender_id, text);
        state
            .messages
            .entry(conversation_id)
            .or_default()
            .push(message.clone());
        Ok(message)
    }

    async fn list_by_conversation(
        &self,
        conversation_id: Uuid,
    ) -> Result<Vec<AuthoredMessage>, AppError> {
        let state = self.state.read();
        let mut messages: Vec<AuthoredMessage> = state
            .messages
            .get(&conversation_id)
            .map(|messages| messages.iter().map(|m| state.authored(m)).collect())
            .unwrap_or_default();
        messages.sort_by_key(|m| m.message.ordering_key());
        Ok(messages)
    }

    async fn unread_count(&self, user_id: Uuid, conversation_id: Uuid) -> Result<i64, AppError> {
        let state = self.state.read();
        let count = state
            .messages
            .get(&conversation_id)
            .map(|messages| messages.iter().filter(|m| m.is_unread_for(user_id)).count())
            .unwrap_or(0);
        Ok(count as i64)
    }
}
