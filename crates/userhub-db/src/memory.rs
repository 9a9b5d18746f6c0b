//! In-process [`UserRepository`] used by the test suites.
//!
//! Enforces the same uniqueness rules as the PostgreSQL schema, so conflict
//! handling can be exercised without a database.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use userhub_models::{NewUser, User, UserChanges, UserCredentials};

use crate::repository::{ConflictField, RepositoryError, UserRepository};

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    // insertion order
    rows: RwLock<Vec<UserCredentials>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_unique(
    rows: &[UserCredentials],
    email: Option<&str>,
    username: Option<&str>,
    exclude_id: Option<Uuid>,
) -> Result<(), RepositoryError> {
    let others = || rows.iter().filter(move |row| Some(row.id) != exclude_id);

    if let Some(email) = email
        && others().any(|row| row.email == email)
    {
        return Err(RepositoryError::Conflict(ConflictField::Email));
    }
    if let Some(username) = username
        && others().any(|row| row.username == username)
    {
        return Err(RepositoryError::Conflict(ConflictField::Username));
    }
    Ok(())
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = self.rows.read().await;
        let mut users: Vec<User> = rows
            .iter()
            .rev()
            .cloned()
            .map(UserCredentials::into_user)
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|row| row.id == id)
            .cloned()
            .map(UserCredentials::into_user))
    }

    async fn find_credentials_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, RepositoryError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|row| row.username == username).cloned())
    }

    async fn find_conflict(
        &self,
        email: Option<&str>,
        username: Option<&str>,
        exclude_id: Option<Uuid>,
    ) -> Result<Option<User>, RepositoryError> {
        let rows = self.rows.read().await;
        let others = || rows.iter().filter(move |row| Some(row.id) != exclude_id);

        let found = email
            .and_then(|email| others().find(|row| row.email == email))
            .or_else(|| {
                username.and_then(|username| others().find(|row| row.username == username))
            });

        Ok(found.cloned().map(UserCredentials::into_user))
    }

    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut rows = self.rows.write().await;
        check_unique(&rows, Some(&user.email), Some(&user.username), None)?;

        let now = Utc::now();
        let row = UserCredentials {
            id: Uuid::new_v4(),
            name: user.name,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        rows.push(row.clone());

        Ok(row.into_user())
    }

    async fn update(
        &self,
        id: Uuid,
        changes: UserChanges,
    ) -> Result<Option<User>, RepositoryError> {
        let mut rows = self.rows.write().await;
        if !rows.iter().any(|row| row.id == id) {
            return Ok(None);
        }
        check_unique(
            &rows,
            changes.email.as_deref(),
            changes.username.as_deref(),
            Some(id),
        )?;

        let Some(row) = rows.iter_mut().find(|row| row.id == id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            row.name = name;
        }
        if let Some(username) = changes.username {
            row.username = username;
        }
        if let Some(email) = changes.email {
            row.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            row.password_hash = password_hash;
        }
        row.updated_at = Utc::now();

        Ok(Some(row.clone().into_user()))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let mut rows = self.rows.write().await;
        let Some(index) = rows.iter().position(|row| row.id == id) else {
            return Ok(None);
        };

        Ok(Some(rows.remove(index).into_user()))
    }
}
