//! Request DTOs
//!
//! Data structures for API request bodies and query strings.

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::application::services::UpdateUserDto;
use crate::domain::UserFilter;
use crate::shared::pagination::PageRequest;
use crate::shared::validation::not_blank;

/// Longest message body accepted.
pub const MAX_MESSAGE_LENGTH: u64 = 2000;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Update user request; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,

    /// Empty string clears the photo.
    #[validate(length(max = 2048, message = "Photo URL must be at most 2048 characters"))]
    pub photo_url: Option<String>,
}

impl From<UpdateUserRequest> for UpdateUserDto {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password,
            photo_url: req.photo_url,
        }
    }
}

/// Send message request
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    /// Receiver of the message
    pub user_id: Uuid,

    #[validate(
        length(min = 1, max = 2000, message = "Message must be 1-2000 characters"),
        custom(function = "not_blank")
    )]
    pub message: String,
}

/// Create conversation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateConversationRequest {
    /// The other participant
    pub user_id: Uuid,
}

/// `GET /users` query string
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListUsersQuery {
    #[validate(length(max = 100, message = "Search must be at most 100 characters"))]
    pub search: Option<String>,

    pub page: Option<u32>,

    pub per_page: Option<u32>,
}

impl ListUsersQuery {
    pub fn into_parts(self) -> (UserFilter, PageRequest) {
        (
            UserFilter {
                search: self.search,
            },
            PageRequest {
                page: self.page,
                per_page: self.per_page,
            },
        )
    }
}
