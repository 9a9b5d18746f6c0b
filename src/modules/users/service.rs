use anyhow::Context;
use tracing::{info, instrument};
use uuid::Uuid;

use userhub_core::AppError;
use userhub_db::{ConflictField, RepositoryError};
use userhub_models::{CreateUserRequest, NewUser, UpdateUserRequest, User, UserChanges};

use crate::state::AppState;

pub const USER_NOT_FOUND_MESSAGE: &str = "User not found";

pub struct UserService;

impl UserService {
    /// Shared by registration and admin creation.
    #[instrument(skip(state, request), fields(username = %request.username))]
    pub async fn create_user(
        state: &AppState,
        request: CreateUserRequest,
    ) -> Result<User, AppError> {
        ensure_available(
            state,
            Some(&request.email),
            Some(&request.username),
            None,
        )
        .await?;

        let password_hash = state
            .passwords
            .hash_blocking(request.password)
            .await
            .context("Failed to hash password")?;

        let user = state
            .users
            .create(NewUser {
                name: request.name,
                username: request.username,
                email: request.email,
                password_hash,
            })
            .await
            .map_err(RepositoryError::into_app_error)?;

        info!(user_id = %user.id, "User created");

        Ok(user)
    }

    #[instrument(skip(state))]
    pub async fn get_users(state: &AppState) -> Result<Vec<User>, AppError> {
        state
            .users
            .list()
            .await
            .map_err(RepositoryError::into_app_error)
    }

    #[instrument(skip(state))]
    pub async fn get_user(state: &AppState, id: Uuid) -> Result<User, AppError> {
        state
            .users
            .find_by_id(id)
            .await
            .map_err(RepositoryError::into_app_error)?
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND_MESSAGE))
    }

    /// Merges the provided fields into the stored user. A request with no
    /// fields returns the user unchanged.
    #[instrument(skip(state, request))]
    pub async fn update_user(
        state: &AppState,
        id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<User, AppError> {
        if request.email.is_some() || request.username.is_some() {
            ensure_available(
                state,
                request.email.as_deref(),
                request.username.as_deref(),
                Some(id),
            )
            .await?;
        }

        let password_hash = match request.password {
            Some(password) => Some(
                state
                    .passwords
                    .hash_blocking(password)
                    .await
                    .context("Failed to hash password")?,
            ),
            None => None,
        };

        let changes = UserChanges {
            name: request.name,
            username: request.username,
            email: request.email,
            password_hash,
        };
        if changes.is_empty() {
            return Self::get_user(state, id).await;
        }

        let user = state
            .users
            .update(id, changes)
            .await
            .map_err(RepositoryError::into_app_error)?
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND_MESSAGE))?;

        info!(user_id = %user.id, "User updated");
        Ok(user)
    }

    #[instrument(skip(state))]
    pub async fn delete_user(state: &AppState, id: Uuid) -> Result<User, AppError> {
        let user = state
            .users
            .delete(id)
            .await
            .map_err(RepositoryError::into_app_error)?
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND_MESSAGE))?;

        info!(user_id = %user.id, "User deleted");
        Ok(user)
    }
}

/// Fails with 409 if another user already holds `email` or `username`.
async fn ensure_available(
    state: &AppState,
    email: Option<&str>,
    username: Option<&str>,
    exclude_id: Option<Uuid>,
) -> Result<(), AppError> {
    let existing = state
        .users
        .find_conflict(email, username, exclude_id)
        .await
        .map_err(RepositoryError::into_app_error)?;

    match existing {
        Some(existing) => {
            let field = ConflictField::of(&existing, email);
            Err(RepositoryError::Conflict(field).into_app_error())
        }
        None => Ok(()),
    }
}
