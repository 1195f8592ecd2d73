//! # Domain Services
//!
//! Business rules that span more than one entity.
//!
//! - **ConversationResolver**: idempotent find-or-create of a direct
//!   conversation and participant authorization

mod conversation_resolver;

pub use conversation_resolver::{ConversationResolver, Resolved};
