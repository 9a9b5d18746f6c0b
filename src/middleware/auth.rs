use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use userhub_core::AppError;

use crate::state::AppState;

pub const MISSING_TOKEN_MESSAGE: &str = "Unauthenticated.";
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid token";

/// The identity a verified token speaks for.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
}

/// Reads the token from `Authorization`, with or without a `Bearer ` prefix.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();

    (!token.is_empty()).then_some(token)
}

/// Rejects the request unless it carries a valid token, and stores the
/// [`AuthUser`] for the handler.
///
/// ```rust,ignore
/// let users = Router::new()
///     .route("/", get(get_users))
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));
/// ```
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(req.headers())
        .ok_or_else(|| AppError::unauthenticated(MISSING_TOKEN_MESSAGE))?;

    let claims = state.tokens.verify(token, Utc::now()).map_err(|err| {
        debug!(error = %err, "Rejected bearer token");
        AppError::unauthenticated(INVALID_TOKEN_MESSAGE)
    })?;

    let user_id = claims.user_id().map_err(|err| {
        debug!(error = %err, sub = %claims.sub, "Token subject is not a user id");
        AppError::unauthenticated(INVALID_TOKEN_MESSAGE)
    })?;

    req.extensions_mut().insert(AuthUser {
        user_id,
        username: claims.username,
    });

    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::unauthenticated(MISSING_TOKEN_MESSAGE))
    }
}
