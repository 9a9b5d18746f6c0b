//! # Userhub Auth
//!
//! Identity tokens for the Userhub API.
//!
//! - [`claims`]: The claim set carried by every token
//! - [`jwt`]: [`TokenService`], which issues and verifies HS256 tokens
//!
//! # Example
//!
//! ```ignore
//! use chrono::Utc;
//! use userhub_auth::{TokenError, TokenService};
//! use userhub_config::JwtConfig;
//!
//! let tokens = TokenService::new(&JwtConfig::from_env());
//! let token = tokens.issue(user_id, "bob1", Utc::now())?;
//!
//! match tokens.verify(&token, Utc::now()) {
//!     Ok(claims) => println!("User ID: {}", claims.sub),
//!     Err(TokenError::Expired) => println!("expired"),
//!     Err(err) => println!("rejected: {err}"),
//! }
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{TokenError, TokenService};
