//! User entity and repository trait.
//!
//! Maps to the `users` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::AppError;
use crate::shared::pagination::PageRequest;

/// Represents a registered account.
///
/// Maps to the `users` table:
/// - id: UUID PRIMARY KEY
/// - name: VARCHAR(100) NOT NULL
/// - email: VARCHAR(255) NOT NULL, unique (case-insensitive) while not deleted
/// - password_hash: VARCHAR(255) NOT NULL
/// - photo_url: TEXT NULL
/// - created_at / updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - deleted_at: TIMESTAMPTZ NULL (soft delete marker)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,

    pub name: String,

    pub email: String,

    /// Argon2 password hash
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub photo_url: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Build a fresh, not yet persisted account.
    pub fn new(name: impl Into<String>, email: impl Into<String>, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            password_hash,
            photo_url: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Public identity shown to other users.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name.clone(),
            photo_url: self.photo_url.clone(),
        }
    }

    pub fn sender(&self) -> SenderProfile {
        SenderProfile {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Counterpart identity echoed in conversation views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub photo_url: Option<String>,
}

/// Author identity attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderProfile {
    pub id: Uuid,
    pub name: String,
}

/// Criteria for listing users.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Case-insensitive substring of the user's name.
    pub search: Option<String>,
}

impl UserFilter {
    /// Trimmed, non-empty search term.
    pub fn term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Identity store contract.
///
/// Lookups never return soft-deleted users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Find a user by email, ignoring case.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn email_exists(&self, email: &str) -> Result<bool, AppError>;

    /// Insert a new user. Fails with `Conflict` when the email is taken.
    async fn create(&self, user: &User) -> Result<User, AppError>;

    /// Persist profile changes. Fails with `NotFound` for unknown or deleted users.
    async fn update(&self, user: &User) -> Result<User, AppError>;

    /// Soft delete.
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;

    /// One page of users plus the total number of matches.
    async fn list(
        &self,
        filter: &UserFilter,
        page: &PageRequest,
    ) -> Result<(Vec<User>, i64), AppError>;
}
