//! Request middleware.
//!
//! - [`auth`]: Bearer token verification and the [`auth::AuthUser`] extractor
//!
//! Body validation lives in [`crate::validator`]. On routes that use both,
//! validation is layered outside authentication so it runs first.

pub mod auth;
