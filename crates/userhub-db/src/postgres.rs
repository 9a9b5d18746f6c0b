//! PostgreSQL-backed [`UserRepository`].
//!
//! Expects the `users` table from `migrations/`. The unique constraints on
//! `username` and `email` are what close the gap between a service's
//! duplicate pre-check and its write.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use userhub_models::{NewUser, User, UserChanges, UserCredentials};

use crate::repository::{ConflictField, RepositoryError, UserRepository};

const USER_COLUMNS: &str = "id, name, username, email, created_at, updated_at";
const USERNAME_CONSTRAINT: &str = "users_username_key";

#[derive(Debug, Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// Turns a unique violation into a field conflict.
fn map_write_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        let field = match db_err.constraint() {
            Some(USERNAME_CONSTRAINT) => ConflictField::Username,
            _ => ConflictField::Email,
        };
        return RepositoryError::Conflict(field);
    }
    RepositoryError::Database(err)
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(users)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_credentials_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, RepositoryError> {
        let credentials = sqlx::query_as::<_, UserCredentials>(
            r#"SELECT id, name, username, email, password_hash, created_at, updated_at
               FROM users
               WHERE username = $1"#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;

        Ok(credentials)
    }

    #[instrument(skip(self))]
    async fn find_conflict(
        &self,
        email: Option<&str>,
        username: Option<&str>,
        exclude_id: Option<Uuid>,
    ) -> Result<Option<User>, RepositoryError> {
        if email.is_none() && username.is_none() {
            return Ok(None);
        }

        let user = sqlx::query_as::<_, User>(&format!(
            r#"SELECT {USER_COLUMNS}
               FROM users
               WHERE (email = $1 OR username = $2)
                 AND ($3::uuid IS NULL OR id <> $3)
               ORDER BY (email = $1) DESC NULLS LAST
               LIMIT 1"#
        ))
        .bind(email)
        .bind(username)
        .bind(exclude_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(&format!(
            r#"INSERT INTO users (id, name, username, email, password_hash)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING {USER_COLUMNS}"#
        ))
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(map_write_error)
    }

    #[instrument(skip(self, changes))]
    async fn update(
        &self,
        id: Uuid,
        changes: UserChanges,
    ) -> Result<Option<User>, RepositoryError> {
        sqlx::query_as::<_, User>(&format!(
            r#"UPDATE users
               SET name = COALESCE($2, name),
                   username = COALESCE($3, username),
                   email = COALESCE($4, email),
                   password_hash = COALESCE($5, password_hash),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {USER_COLUMNS}"#
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.username)
        .bind(changes.email)
        .bind(changes.password_hash)
        .fetch_optional(&self.db)
        .await
        .map_err(map_write_error)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }
}
