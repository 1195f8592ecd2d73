//! Repository Implementations
//!
//! PostgreSQL implementations of the domain repository traits.
//!
//! - **PgUserRepository**: accounts with soft delete and name search
//! - **PgConversationRepository**: idempotent pair creation and overviews
//! - **PgMessageRepository**: append-only message ledger
//!
//! ```rust,ignore
//! let users = PgUserRepository::new(pool.clone());
//! let conversations = PgConversationRepository::new(pool.clone());
//! let messages = PgMessageRepository::new(pool);
//! ```

pub mod conversation_repository;
pub mod message_repository;
pub mod user_repository;

pub use conversation_repository::PgConversationRepository;
pub use message_repository::PgMessageRepository;
pub use user_repository::PgUserRepository;
