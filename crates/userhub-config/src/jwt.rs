use crate::{env_parse, env_string};

/// Secret used when `JWT_SECRET` is unset. Rejected in production by
/// [`AppConfig::validate`](crate::AppConfig::validate).
pub const DEFAULT_JWT_SECRET: &str = "userhub-dev-secret-change-me";

/// Longest accepted `JWT_EXPIRY`, in seconds (one year).
pub const MAX_ACCESS_TOKEN_EXPIRY: i64 = 365 * 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expiry: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_JWT_SECRET.to_string(),
            access_token_expiry: 3600, // 1 hour
        }
    }
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env_string("JWT_SECRET", DEFAULT_JWT_SECRET),
            access_token_expiry: env_parse("JWT_EXPIRY", 3600),
        }
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret == DEFAULT_JWT_SECRET
    }

    pub fn has_valid_expiry(&self) -> bool {
        (1..=MAX_ACCESS_TOKEN_EXPIRY).contains(&self.access_token_expiry)
    }
}
