//! # Userhub Core
//!
//! Core types, errors, and utilities for the Userhub API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`response`]: The success envelope
//! - [`schema`]: Declarative request validation
//! - [`password`]: Argon2id password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use userhub_core::{AppError, PasswordHasher};
//! use userhub_config::PasswordConfig;
//!
//! let error = AppError::not_found("User not found");
//!
//! let hasher = PasswordHasher::new(&PasswordConfig::default())?;
//! let hash = hasher.hash("secure_password")?;
//! assert!(hasher.verify("secure_password", &hash));
//! ```

pub mod errors;
pub mod password;
pub mod response;
pub mod schema;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorResponse, FieldErrors};
pub use password::{PasswordError, PasswordHasher};
pub use response::ApiResponse;
pub use schema::{FieldSpec, Schema, SchemaError};
