//! User domain models and request schemas.
//!
//! [`User`] is the public projection and has no password field at all.
//! The stored hash only travels inside [`UserCredentials`], which the
//! repository produces for login and nothing else.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use userhub_core::{FieldSpec, Schema};

/// A user as returned by the API.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: Uuid,
    #[schema(example = "Bob")]
    pub name: String,
    #[schema(example = "bob1")]
    pub username: String,
    #[schema(example = "b@x.io")]
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user row together with its password hash.
#[derive(FromRow, Clone)]
pub struct UserCredentials {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredentials")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl UserCredentials {
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            name: self.name,
            username: self.username,
            email: self.email,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A user ready to be inserted. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Fields to overwrite on an existing user. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.username.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
    }
}

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    match name.chars().count() {
        0 => Err(rule("length", "Name is required")),
        101.. => Err(rule("length", "Name must be at most 100 characters")),
        _ => Ok(()),
    }
}

/// Length bounds only. Login accepts any username shape.
pub fn validate_username_length(username: &str) -> Result<(), ValidationError> {
    match username.chars().count() {
        0..3 => Err(rule("length", "Username must be at least 3 characters")),
        33.. => Err(rule("length", "Username must be at most 32 characters")),
        _ => Ok(()),
    }
}

/// Length bounds, then the character set: ASCII letters, digits and
/// underscore. Runs after lowercasing, so upper-case input is accepted.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    validate_username_length(username)?;

    if username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Ok(());
    }

    Err(rule(
        "username_charset",
        "Username may only contain letters, numbers, and underscores",
    ))
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    match password.chars().count() {
        0..6 => Err(rule("length", "Password must be at least 6 characters")),
        129.. => Err(rule("length", "Password must be at most 128 characters")),
        _ => Ok(()),
    }
}

/// ASCII-only folding, so characters like the Kelvin sign stay outside the
/// allowed set instead of turning into `k`.
pub fn normalize_username(username: &str) -> String {
    username.trim().to_ascii_lowercase()
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Body of `POST /api/register` and `POST /api/users`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(custom(function = "validate_name"))]
    #[schema(example = "Bob")]
    pub name: String,
    #[validate(custom(function = "validate_username"))]
    #[schema(example = "bob1")]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "b@x.io")]
    pub email: String,
    #[validate(custom(function = "validate_password"))]
    #[schema(example = "secret1")]
    pub password: String,
}

impl Schema for CreateUserRequest {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("name"),
        FieldSpec::required("username"),
        FieldSpec::required("email"),
        FieldSpec::required("password"),
    ];

    fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        self.username = normalize_username(&self.username);
        self.email = normalize_email(&self.email);
    }
}

/// Body of `PUT /api/users/{id}`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(custom(function = "validate_name"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_username"))]
    pub username: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    /// A blank password is treated as absent.
    #[validate(custom(function = "validate_password"))]
    pub password: Option<String>,
}

impl Schema for UpdateUserRequest {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("name"),
        FieldSpec::optional("username"),
        FieldSpec::optional("email"),
        FieldSpec::optional("password"),
    ];

    fn normalize(&mut self) {
        self.name = self.name.as_deref().map(|name| name.trim().to_string());
        self.username = self.username.as_deref().map(normalize_username);
        self.email = self.email.as_deref().map(normalize_email);
        if self
            .password
            .as_deref()
            .is_some_and(|password| password.trim().is_empty())
        {
            self.password = None;
        }
    }
}
