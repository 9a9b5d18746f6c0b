//! # Userhub DB
//!
//! Database pool and user persistence for the Userhub API.
//!
//! The rest of the application only sees the [`UserRepository`] trait.
//! [`PgUserRepository`] backs it with PostgreSQL; [`InMemoryUserRepository`]
//! keeps everything in process and is what the test suites run against.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use userhub_config::DatabaseConfig;
//! use userhub_db::{PgUserRepository, UserRepository, init_db_pool};
//!
//! let pool = init_db_pool(&DatabaseConfig::from_env()?).await?;
//! let users: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool));
//! ```

pub mod memory;
pub mod postgres;
pub mod repository;

use sqlx::postgres::PgPoolOptions;
use tracing::info;
use userhub_config::DatabaseConfig;

pub use memory::InMemoryUserRepository;
pub use postgres::PgUserRepository;
pub use repository::{ConflictField, RepositoryError, UserRepository};

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Connects a PostgreSQL pool. Fails if the database is unreachable.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await?;

    info!(max_connections = config.max_connections, "Database pool ready");
    Ok(pool)
}
