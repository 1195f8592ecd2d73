//! # Messenger API
//!
//! A small direct-messaging backend:
//! - user accounts with bearer token authentication
//! - one conversation per pair of users, opened implicitly by the first message
//! - message history and conversation lists with unread counts
//! - PostgreSQL storage, or an in-memory store when no database is configured
//!
//! ## Architecture
//!
//! - **Domain Layer**: entities, repository traits, conversation rules
//! - **Application Layer**: services and DTOs
//! - **Infrastructure Layer**: PostgreSQL and in-memory repositories, metrics
//! - **Presentation Layer**: HTTP handlers and middleware
//!
//! ## Module Structure
//!
//! ```text
//! messenger_api/
//! +-- config/         Configuration management
//! +-- domain/         Entities, value objects, repository traits
//! +-- application/    Services and DTOs
//! +-- infrastructure/ Storage backends and metrics
//! +-- presentation/   HTTP routes and middleware
//! +-- shared/         Errors, pagination, validation helpers
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
