//! Authentication Service
//!
//! Password hashing, token issuance and request authentication.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtSettings;
use crate::domain::{User, UserRepository};
use crate::shared::error::AppError;

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

/// A signed token and the instant it stops being accepted.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Email already exists")]
    EmailExists,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                AppError::Unauthorized("Invalid email or password".into())
            }
            AuthError::TokenExpired => AppError::Unauthorized("Token expired".into()),
            AuthError::InvalidToken => AppError::Unauthorized("Invalid token".into()),
            AuthError::UserNotFound => AppError::Unauthorized("User no longer exists".into()),
            AuthError::EmailExists => AppError::Conflict("Email already exists".into()),
            AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Password hashing and token signing.
pub trait CredentialService: Send + Sync {
    fn hash_password(&self, password: &str) -> Result<String, AuthError>;

    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError>;

    fn issue_token(&self, user_id: Uuid, email: &str) -> Result<IssuedToken, AuthError>;

    fn parse_token(&self, token: &str) -> Result<Claims, AuthError>;
}

/// Argon2id passwords and HS256 tokens.
pub struct JwtCredentialService {
    settings: JwtSettings,
}

impl JwtCredentialService {
    pub fn new(settings: JwtSettings) -> Self {
        Self { settings }
    }
}

impl CredentialService for JwtCredentialService {
    fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))
    }

    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    fn issue_token(&self, user_id: Uuid, email: &str) -> Result<IssuedToken, AuthError> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.settings.token_expiry_hours);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.settings.secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(format!("Token generation failed: {}", e)))?;

        // Whole seconds, matching what `exp` can carry.
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .unwrap_or(expires_at);

        Ok(IssuedToken { token, expires_at })
    }

    fn parse_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.settings.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?;

        Ok(token_data.claims)
    }
}

/// Authentication service trait for dependency injection
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account. Emails are compared case-insensitively.
    async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError>;

    /// Exchange credentials for a token.
    async fn login(&self, email: &str, password: &str) -> Result<IssuedToken, AuthError>;

    /// Resolve a bearer token to a live account.
    async fn authenticate(&self, token: &str) -> Result<AuthUser, AuthError>;
}

/// AuthService implementation
pub struct AuthServiceImpl<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    credentials: Arc<dyn CredentialService>,
}

impl<U> AuthServiceImpl<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, credentials: Arc<dyn CredentialService>) -> Self {
        Self {
            user_repo,
            credentials,
        }
    }
}

#[async_trait]
impl<U> AuthService for AuthServiceImpl<U>
where
    U: UserRepository + 'static,
{
    async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError> {
        let email = email.to_lowercase();

        if self
            .user_repo
            .email_exists(&email)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
        {
            return Err(AuthError::EmailExists);
        }

        let password_hash = self.credentials.hash_password(password)?;
        let user = User::new(name.trim(), email, password_hash);

        let created = self.user_repo.create(&user).await.map_err(|e| match e {
            // Lost a race with a concurrent registration.
            AppError::Conflict(_) => AuthError::EmailExists,
            e => AuthError::Internal(e.to_string()),
        })?;

        tracing::info!(user_id = %created.id, "user registered");
        Ok(created)
    }

    async fn login(&self, email: &str, password: &str) -> Result<IssuedToken, AuthError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.credentials.verify_password(password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let issued = self.credentials.issue_token(user.id, &user.email)?;
        tracing::info!(user_id = %user.id, "user logged in");
        Ok(issued)
    }

    async fn authenticate(&self, token: &str) -> Result<AuthUser, AuthError> {
        let claims = self.credentials.parse_token(token)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

        // Deleted accounts keep valid signatures until expiry.
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::UserNotFound)?;

        Ok(AuthUser {
            user_id: user.id,
            email: user.email,
        })
    }
}
