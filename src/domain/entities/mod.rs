//! # Domain Entities
//!
//! Core business objects of the messenger. Each entity maps to one table.
//!
//! - **User**: account with credentials and public profile
//! - **Conversation**: the direct channel between two users
//! - **Message**: text posted into a conversation
//!
//! Each entity has a repository trait here; the PostgreSQL and in-memory
//! implementations live in the infrastructure layer.

mod conversation;
mod message;
mod user;

pub use conversation::{Conversation, ConversationOverview, ConversationRepository};
pub use message::{AuthoredMessage, Message, MessageRepository};
pub use user::{SenderProfile, User, UserFilter, UserProfile, UserRepository};

#[cfg(test)]
pub use conversation::MockConversationRepository;
#[cfg(test)]
pub use message::MockMessageRepository;
#[cfg(test)]
pub use user::MockUserRepository;
