//! JWT (JSON Web Token) issuance and verification.
//!
//! Tokens are HS256-signed and carry [`Claims`]. They are stateless: the
//! server keeps no record of issued tokens, so validity is decided only by
//! the signature and the `exp` claim.
//!
//! The current instant is always passed in by the caller. This keeps the
//! service deterministic under test and makes the expiry rule explicit:
//! a token whose `exp` is at or before `now` is expired.
//!
//! # Example
//!
//! ```ignore
//! use chrono::Utc;
//! use userhub_auth::TokenService;
//! use userhub_config::JwtConfig;
//!
//! let tokens = TokenService::new(&JwtConfig::from_env());
//! let token = tokens.issue(user_id, "bob1", Utc::now())?;
//! let claims = tokens.verify(&token, Utc::now())?;
//! assert_eq!(claims.sub, user_id.to_string());
//! ```

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use uuid::Uuid;

use userhub_config::JwtConfig;

use crate::claims::Claims;

/// Why a token was rejected.
///
/// The variants exist for logging. Callers facing clients must collapse
/// all of them into one response.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token lifetime does not fit in a timestamp")]
    ExpiryOutOfRange,
    #[error("failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: TimeDelta,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &"HS256")
            .field("ttl_seconds", &self.ttl.num_seconds())
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller's clock in `verify`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims =
            HashSet::from(["exp".to_string(), "sub".to_string()]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            // unrepresentable lifetimes surface as ExpiryOutOfRange on issue
            ttl: TimeDelta::try_seconds(config.access_token_expiry).unwrap_or(TimeDelta::MAX),
        }
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Signs a token for `user_id` that expires one TTL after `now`.
    pub fn issue(
        &self,
        user_id: Uuid,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or(TokenError::ExpiryOutOfRange)?;

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Checks the signature, then the expiry, and returns the claims.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })?;

        if claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: 3600,
        }
    }

    fn at(timestamp: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(timestamp, 0).unwrap()
    }

    #[test]
    fn test_issue_token_success() {
        let tokens = TokenService::new(&get_test_jwt_config());
        let token = tokens.issue(Uuid::new_v4(), "bob1", Utc::now()).unwrap();

        assert!(!token.is_empty());
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_verify_token_success() {
        let tokens = TokenService::new(&get_test_jwt_config());
        let user_id = Uuid::new_v4();
        let now = Utc::now();

        let token = tokens.issue(user_id, "bob1", now).unwrap();
        let claims = tokens.verify(&token, now).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.username, "bob1");
        assert_eq!(claims.user_id().unwrap(), user_id);
    }

    #[test]
    fn test_expiry_is_one_ttl_after_issue() {
        let tokens = TokenService::new(&get_test_jwt_config());
        let now = at(1_700_000_000);

        let token = tokens.issue(Uuid::new_v4(), "bob1", now).unwrap();
        let claims = tokens.verify(&token, now).unwrap();

        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_token_valid_until_exp() {
        let tokens = TokenService::new(&get_test_jwt_config());
        let issued = at(1_700_000_000);
        let token = tokens.issue(Uuid::new_v4(), "bob1", issued).unwrap();

        assert!(tokens.verify(&token, at(1_700_003_599)).is_ok());
        assert!(matches!(
            tokens.verify(&token, at(1_700_003_600)),
            Err(TokenError::Expired)
        ));
        assert!(matches!(
            tokens.verify(&token, at(1_800_000_000)),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_verify_token_wrong_secret() {
        let tokens = TokenService::new(&get_test_jwt_config());
        let token = tokens.issue(Uuid::new_v4(), "bob1", Utc::now()).unwrap();

        let other = TokenService::new(&JwtConfig {
            secret: "different-secret-key-at-least-32-characters".to_string(),
            access_token_expiry: 3600,
        });

        assert!(matches!(
            other.verify(&token, Utc::now()),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn test_signature_checked_before_expiry() {
        let tokens = TokenService::new(&get_test_jwt_config());
        let token = tokens.issue(Uuid::new_v4(), "bob1", at(1_000)).unwrap();

        let other = TokenService::new(&JwtConfig {
            secret: "different-secret-key-at-least-32-characters".to_string(),
            access_token_expiry: 3600,
        });

        assert!(matches!(
            other.verify(&token, at(1_000_000)),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn test_verify_token_malformed() {
        let tokens = TokenService::new(&get_test_jwt_config());
        let malformed_tokens = vec![
            "",
            "invalid-token",
            "not.enough",
            "too.many.parts.here.extra",
            "!!!.invalid.chars",
            "header.payload.",
            ".payload.signature",
        ];

        for token in malformed_tokens {
            let result = tokens.verify(token, Utc::now());
            assert!(
                matches!(result, Err(TokenError::Malformed)),
                "expected malformed for {token:?}, got {result:?}"
            );
        }
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let tokens = TokenService::new(&get_test_jwt_config());
        let token = tokens.issue(Uuid::new_v4(), "bob1", Utc::now()).unwrap();
        let forged = tokens.issue(Uuid::new_v4(), "mallory", Utc::now()).unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);

        assert!(tokens.verify(&spliced, Utc::now()).is_err());
    }

    #[test]
    fn test_ttl_from_config() {
        let tokens = TokenService::new(&JwtConfig {
            secret: "secret".to_string(),
            access_token_expiry: 120,
        });
        assert_eq!(tokens.ttl(), TimeDelta::seconds(120));
    }

    #[test]
    fn test_unrepresentable_ttl_fails_to_issue() {
        for access_token_expiry in [9_000_000_000_000, i64::MAX] {
            let tokens = TokenService::new(&JwtConfig {
                secret: "secret".to_string(),
                access_token_expiry,
            });

            assert!(matches!(
                tokens.issue(Uuid::new_v4(), "bob1", Utc::now()),
                Err(TokenError::ExpiryOutOfRange)
            ));
        }
    }
}
