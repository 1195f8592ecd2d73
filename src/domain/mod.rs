//! # Domain Layer
//!
//! Core business logic of the messenger, independent of HTTP and storage.
//!
//! ## Structure
//!
//! - **entities**: User, Conversation, Message and their repository traits
//! - **value_objects**: immutable value types (ParticipantPair)
//! - **services**: rules spanning several entities (ConversationResolver)

pub mod entities;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use value_objects::*;
