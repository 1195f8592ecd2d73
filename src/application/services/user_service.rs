//! User Service
//!
//! Handles user lookup, profile updates, account deletion and listing.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::auth_service::CredentialService;
use crate::domain::{User, UserFilter, UserRepository};
use crate::shared::error::AppError;
use crate::shared::pagination::{Page, PageRequest};

/// User service trait
#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_user(&self, user_id: Uuid) -> Result<User, UserError>;

    /// Apply `update` to `target_id` on behalf of `actor_id`.
    async fn update_user(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
        update: UpdateUserDto,
    ) -> Result<User, UserError>;

    /// Soft delete `target_id` on behalf of `actor_id`.
    async fn delete_user(&self, actor_id: Uuid, target_id: Uuid) -> Result<(), UserError>;

    async fn list_users(
        &self,
        filter: UserFilter,
        page: PageRequest,
    ) -> Result<Page<User>, UserError>;
}

/// Profile changes; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserDto {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// An empty string removes the photo.
    pub photo_url: Option<String>,
}

/// User service errors
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Email already taken")]
    EmailTaken,

    #[error("Users may only modify their own account")]
    Forbidden,

    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AppError> for UserError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::NotFound(_) => UserError::NotFound,
            AppError::Conflict(_) => UserError::EmailTaken,
            AppError::Validation(msg) => UserError::Validation(msg),
            e => UserError::Internal(e.to_string()),
        }
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound => AppError::NotFound("User not found".into()),
            UserError::EmailTaken => AppError::Conflict("Email already exists".into()),
            UserError::Forbidden => {
                AppError::Forbidden("Users may only modify their own account".into())
            }
            UserError::Validation(msg) => AppError::Validation(msg),
            UserError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// UserService implementation
pub struct UserServiceImpl<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    credentials: Arc<dyn CredentialService>,
}

impl<U> UserServiceImpl<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, credentials: Arc<dyn CredentialService>) -> Self {
        Self {
            user_repo,
            credentials,
        }
    }

    fn ensure_self(actor_id: Uuid, target_id: Uuid) -> Result<(), UserError> {
        if actor_id != target_id {
            return Err(UserError::Forbidden);
        }
        Ok(())
    }
}

#[async_trait]
impl<U> UserService for UserServiceImpl<U>
where
    U: UserRepository + 'static,
{
    async fn get_user(&self, user_id: Uuid) -> Result<User, UserError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(UserError::NotFound)
    }

    async fn update_user(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
        update: UpdateUserDto,
    ) -> Result<User, UserError> {
        Self::ensure_self(actor_id, target_id)?;

        let mut user = self
            .user_repo
            .find_by_id(target_id)
            .await?
            .ok_or(UserError::NotFound)?;

        if let Some(name) = update.name {
            user.name = name.trim().to_string();
        }

        if let Some(email) = update.email {
            let email = email.to_lowercase();
            if !email.eq_ignore_ascii_case(&user.email)
                && self.user_repo.email_exists(&email).await?
            {
                return Err(UserError::EmailTaken);
            }
            user.email = email;
        }

        if let Some(password) = update.password {
            user.password_hash = self
                .credentials
                .hash_password(&password)
                .map_err(|e| UserError::Internal(e.to_string()))?;
        }

        if let Some(photo_url) = update.photo_url {
            let photo_url = photo_url.trim();
            user.photo_url = (!photo_url.is_empty()).then(|| photo_url.to_string());
        }

        let updated = self.user_repo.update(&user).await?;
        tracing::info!(user_id = %updated.id, "user profile updated");
        Ok(updated)
    }

    async fn delete_user(&self, actor_id: Uuid, target_id: Uuid) -> Result<(), UserError> {
        Self::ensure_self(actor_id, target_id)?;

        self.user_repo.delete(target_id).await?;
        tracing::info!(user_id = %target_id, "user deleted");
        Ok(())
    }

    async fn list_users(
        &self,
        filter: UserFilter,
        page: PageRequest,
    ) -> Result<Page<User>, UserError> {
        let (users, total) = self.user_repo.list(&filter, &page).await?;
        page.ensure_within(total)?;

        Ok(Page::new(users, &page, total))
    }
}
