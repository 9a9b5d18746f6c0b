//! The user persistence port.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use userhub_core::AppError;
use userhub_models::{NewUser, User, UserChanges, UserCredentials};

/// The unique field a write collided on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictField {
    Email,
    Username,
}

impl ConflictField {
    /// Attributes a conflict with `existing`: email when the emails match,
    /// username otherwise.
    pub fn of(existing: &User, email: Option<&str>) -> Self {
        if email.is_some_and(|email| existing.email == email) {
            Self::Email
        } else {
            Self::Username
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Username => "username",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Email => "Email already registered",
            Self::Username => "Username already taken",
        }
    }
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{} already taken", .0.as_str())]
    Conflict(ConflictField),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl RepositoryError {
    /// Conflicts become 409 responses, everything else is internal.
    pub fn into_app_error(self) -> AppError {
        match self {
            Self::Conflict(field) => AppError::conflict(field.as_str(), field.message()),
            Self::Database(err) => AppError::internal(err),
        }
    }
}

/// Storage for users, keyed by id with unique `username` and `email`.
///
/// Usernames and emails are compared exactly. Callers lowercase them
/// before they get here.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users, newest first.
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;

    /// The only lookup that exposes the password hash.
    async fn find_credentials_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, RepositoryError>;

    /// A user other than `exclude_id` holding `email` or `username`.
    /// An email match is returned in preference to a username match.
    async fn find_conflict(
        &self,
        email: Option<&str>,
        username: Option<&str>,
        exclude_id: Option<Uuid>,
    ) -> Result<Option<User>, RepositoryError>;

    async fn create(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Applies `changes` and bumps `updated_at`. `None` if no such user.
    async fn update(&self, id: Uuid, changes: UserChanges)
    -> Result<Option<User>, RepositoryError>;

    /// Removes the user and returns it. `None` if no such user.
    async fn delete(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;
}
