//! Application Services
//!
//! Use cases that coordinate the domain repositories.
//!
//! ## Available Services
//!
//! - **AuthService**: registration, login, token authentication
//! - **UserService**: profile lookup, update, soft delete, listing
//! - **ConversationService**: open, view and list conversations
//! - **MessageService**: send messages and read history

pub mod auth_service;
pub mod conversation_service;
pub mod message_service;
pub mod user_service;

pub use auth_service::{
    AuthError, AuthService, AuthServiceImpl, AuthUser, Claims, CredentialService, IssuedToken,
    JwtCredentialService,
};
pub use conversation_service::{
    ConversationDto, ConversationError, ConversationService, ConversationServiceImpl,
    ConversationSummaryDto, LastMessagePreview,
};
pub use message_service::{
    MessageDto, MessageError, MessageService, MessageServiceImpl, SentMessageDto,
};
pub use user_service::{UpdateUserDto, UserError, UserService, UserServiceImpl};
