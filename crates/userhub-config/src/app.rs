use std::env;
use std::fmt;

use thiserror::Error;

use crate::{
    CorsConfig, DatabaseConfig, JwtConfig, PasswordConfig, env_parse, env_string,
};

/// Errors raised while assembling the configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("JWT_SECRET must be set to a non-default value when APP_ENV=production")]
    InsecureSecret,
    #[error("JWT_SECRET must not be empty")]
    EmptySecret,
    #[error("JWT_EXPIRY must be between 1 and {max} seconds, got {0}", max = crate::jwt::MAX_ACCESS_TOKEN_EXPIRY)]
    InvalidTokenExpiry(i64),
}

/// Deployment environment, read from `APP_ENV`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    pub fn from_env() -> Self {
        env::var("APP_ENV")
            .map(|value| Self::parse(&value))
            .unwrap_or_default()
    }

    /// Unknown values fall back to development.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "test" => Self::Test,
            _ => Self::Development,
        }
    }

    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        };
        f.write_str(name)
    }
}

/// HTTP listener settings.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Port of the separate Prometheus listener.
    pub metrics_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            metrics_port: 9090,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_string("SERVER_HOST", &defaults.host),
            port: env_parse("SERVER_PORT", defaults.port),
            metrics_port: env_parse("METRICS_PORT", defaults.metrics_port),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn metrics_address(&self) -> String {
        format!("{}:{}", self.host, self.metrics_port)
    }
}

/// Log output settings.
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub log_dir: String,
    /// Disables Prometheus metrics when false. Read from `OBSERVABILITY_ENABLED`.
    pub observability_enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: "storage/logs".to_string(),
            observability_enabled: true,
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            log_dir: env_string("LOG_DIR", "storage/logs"),
            observability_enabled: env::var("OBSERVABILITY_ENABLED")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),
        }
    }
}

/// Complete application configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            environment: Environment::from_env(),
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env()?,
            jwt: JwtConfig::from_env(),
            password: PasswordConfig::from_env(),
            cors: CorsConfig::from_env(),
            logging: LoggingConfig::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that are only acceptable outside production.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        if self.environment.is_production() && self.jwt.uses_default_secret() {
            return Err(ConfigError::InsecureSecret);
        }
        if !self.jwt.has_valid_expiry() {
            return Err(ConfigError::InvalidTokenExpiry(self.jwt.access_token_expiry));
        }
        Ok(())
    }
}
