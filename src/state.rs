use std::sync::Arc;

use anyhow::Context;
use userhub_auth::TokenService;
use userhub_config::{AppConfig, CorsConfig};
use userhub_core::PasswordHasher;
use userhub_db::{PgUserRepository, UserRepository, init_db_pool};

/// Shared, cheaply clonable application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<TokenService>,
    pub passwords: Arc<PasswordHasher>,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(config: &AppConfig, users: Arc<dyn UserRepository>) -> anyhow::Result<Self> {
        let passwords =
            PasswordHasher::new(&config.password).context("Invalid password hashing parameters")?;

        Ok(Self {
            users,
            tokens: Arc::new(TokenService::new(&config.jwt)),
            passwords: Arc::new(passwords),
            cors_config: config.cors.clone(),
        })
    }
}

/// Connects to PostgreSQL and builds the state the server runs with.
pub async fn init_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let pool = init_db_pool(&config.database)
        .await
        .context("Failed to connect to database")?;

    AppState::new(config, Arc::new(PgUserRepository::new(pool)))
}
