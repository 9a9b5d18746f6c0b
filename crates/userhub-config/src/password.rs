use crate::env_parse;

/// Argon2id cost parameters.
///
/// The defaults follow the OWASP minimum for Argon2id (19 MiB, 2 passes,
/// 1 lane).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl PasswordConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            memory_kib: env_parse("PASSWORD_MEMORY_KIB", defaults.memory_kib),
            iterations: env_parse("PASSWORD_ITERATIONS", defaults.iterations),
            parallelism: env_parse("PASSWORD_PARALLELISM", defaults.parallelism),
        }
    }
}
