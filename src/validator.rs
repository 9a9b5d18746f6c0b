//! Body validation middleware.
//!
//! [`validate_body`] is layered per route with the schema the route expects:
//!
//! ```ignore
//! post(register_user).route_layer(middleware::from_fn(validate_body::<RegisterRequest>))
//! ```
//!
//! Checks run in a fixed order and the first failure answers the request:
//! content type (415), JSON syntax (400), schema (422). On success the
//! normalized payload is stored in the request extensions and the handler
//! takes it with the [`Validated`] extractor.

use anyhow::anyhow;
use axum::{
    body::{Body, to_bytes},
    extract::{FromRequestParts, Request},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use serde_json::Value;
use tracing::debug;

use userhub_core::{AppError, Schema, schema};

/// Request bodies above this size are rejected as malformed.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// A payload that passed its schema.
#[derive(Debug, Clone)]
pub struct Validated<T>(pub T);

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.to_ascii_lowercase().contains("application/json"))
}

pub async fn validate_body<T>(req: Request, next: Next) -> Result<Response, AppError>
where
    T: Schema + Clone + Send + Sync + 'static,
{
    if !is_json(req.headers()) {
        return Err(AppError::unsupported_media_type());
    }

    let (mut parts, body) = req.into_parts();
    let bytes = to_bytes(body, MAX_BODY_BYTES).await.map_err(|err| {
        debug!(error = %err, "Failed to read request body");
        AppError::malformed_body()
    })?;

    let raw: Value = serde_json::from_slice(&bytes).map_err(|err| {
        debug!(error = %err, "Request body is not valid JSON");
        AppError::malformed_body()
    })?;

    let payload = schema::validate::<T>(raw).map_err(|err| {
        debug!(error = %err, "Request body failed validation");
        AppError::validation(err)
    })?;

    parts.extensions.insert(Validated(payload));
    Ok(next.run(Request::from_parts(parts, Body::empty())).await)
}

impl<T, S> FromRequestParts<S> for Validated<T>
where
    T: Clone + Send + Sync + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.remove::<Validated<T>>().ok_or_else(|| {
            AppError::internal(anyhow!(
                "no validated payload of type {}; is validate_body layered on this route?",
                std::any::type_name::<T>()
            ))
        })
    }
}
