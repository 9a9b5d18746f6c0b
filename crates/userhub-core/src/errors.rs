//! Application error type and its HTTP rendering.
//!
//! Every failure leaves the service as the uniform failure envelope:
//!
//! ```json
//! { "success": false, "message": "Validation Failed!", "errors": { "email": "Invalid email format" } }
//! ```
//!
//! Server errors (5xx) never expose their cause. The cause is logged and the
//! body carries the generic `Internal server error` message.

use std::collections::BTreeMap;

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::schema::SchemaError;

/// Field path to a single human-readable message.
pub type FieldErrors = BTreeMap<String, String>;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
pub const VALIDATION_FAILED_MESSAGE: &str = "Validation Failed!";

/// Failure envelope as serialized on the wire.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    pub errors: Option<FieldErrors>,
    pub source: Option<Error>,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            errors: None,
            source: None,
        }
    }

    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            source: Some(err.into()),
            ..Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
        }
    }

    pub fn unsupported_media_type() -> Self {
        Self::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Unsupported Media Type: use application/json",
        )
    }

    pub fn malformed_body() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Invalid JSON payload")
    }

    pub fn validation(err: SchemaError) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, VALIDATION_FAILED_MESSAGE)
            .with_errors(err.into_field_errors())
    }

    /// A uniqueness conflict attributed to one field.
    pub fn conflict(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), "Already taken".to_string());
        Self::new(StatusCode::CONFLICT, message).with_errors(errors)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            match &self.source {
                Some(cause) => error!(status = %self.status.as_u16(), error = ?cause, "Request failed"),
                None => error!(status = %self.status.as_u16(), message = %self.message, "Request failed"),
            }

            let body = ErrorResponse {
                success: false,
                message: INTERNAL_ERROR_MESSAGE.to_string(),
                errors: None,
            };
            return (self.status, Json(body)).into_response();
        }

        let body = ErrorResponse {
            success: false,
            message: self.message,
            errors: self.errors,
        };

        (self.status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}
