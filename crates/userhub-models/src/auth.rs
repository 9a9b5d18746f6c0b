//! Authentication request schemas and responses.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use userhub_core::{FieldSpec, Schema};

use crate::users::{CreateUserRequest, User, normalize_username, validate_username_length};

/// Registration takes exactly the fields of an admin-created user.
pub type RegisterRequest = CreateUserRequest;

fn validate_login_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < 6 {
        return Err(ValidationError::new("length")
            .with_message("Password must be at least 6 characters".into()));
    }
    Ok(())
}

/// Login with username and password.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(custom(function = "validate_username_length"))]
    #[schema(example = "bob1")]
    pub username: String,
    #[validate(custom(function = "validate_login_password"))]
    #[schema(example = "secret1")]
    pub password: String,
}

impl Schema for LoginRequest {
    const FIELDS: &'static [FieldSpec] =
        &[FieldSpec::required("username"), FieldSpec::required("password")];

    fn normalize(&mut self) {
        self.username = normalize_username(&self.username);
    }
}

/// Successful login: the user and a signed identity token.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}
