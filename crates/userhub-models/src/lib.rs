//! # Userhub Models
//!
//! Domain models and request schemas for the Userhub API.
//!
//! - [`users`]: The user entity, its persistence shapes and CRUD schemas
//! - [`auth`]: Register and login schemas, login response
//!
//! Every request schema implements [`userhub_core::Schema`], so it can be
//! handed to the validation middleware directly.
//!
//! # Example
//!
//! ```ignore
//! use userhub_core::schema::validate;
//! use userhub_models::LoginRequest;
//!
//! let login: LoginRequest = validate(serde_json::json!({
//!     "username": " Bob1 ",
//!     "password": "secret1",
//! }))?;
//! assert_eq!(login.username, "bob1");
//! ```

pub mod auth;
pub mod users;

pub use auth::{LoginRequest, LoginResponse, RegisterRequest};
pub use users::{
    CreateUserRequest, NewUser, UpdateUserRequest, User, UserChanges, UserCredentials,
};
