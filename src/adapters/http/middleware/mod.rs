//! HTTP middleware for axum.
//!
//! - `auth` - Extractors for the calling user

pub mod auth;

pub use auth::{AuthRejection, CurrentUser, OptionalUser, USER_ID_HEADER};
