//! # Userhub Config
//!
//! Configuration types for the Userhub API.
//!
//! Every structure is loaded once at startup from environment variables and
//! then passed by reference into the services that need it. Nothing in the
//! request path reads the environment.
//!
//! - [`app`]: Top-level [`AppConfig`], runtime [`Environment`], server and logging settings
//! - [`jwt`]: Token signing secret and lifetime
//! - [`password`]: Argon2id cost parameters
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`database`]: PostgreSQL connection settings
//!
//! # Example
//!
//! ```ignore
//! use userhub_config::AppConfig;
//!
//! dotenvy::dotenv().ok();
//! let config = AppConfig::from_env()?;
//! println!("listening on {}", config.server.address());
//! ```

pub mod app;
pub mod cors;
pub mod database;
pub mod jwt;
pub mod password;

// Re-export commonly used types at crate root
pub use app::{AppConfig, ConfigError, Environment, LoggingConfig, ServerConfig};
pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use jwt::{JwtConfig, MAX_ACCESS_TOKEN_EXPIRY};
pub use password::PasswordConfig;

use std::env;
use std::str::FromStr;

/// Reads `key` and parses it, falling back to `default` when the variable is
/// unset or unparsable.
pub(crate) fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

pub(crate) fn env_string(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
