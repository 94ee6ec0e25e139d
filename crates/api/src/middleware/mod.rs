//! Request extractors.
//!
//! - [`auth::AuthUser`] -- Resolves the `Authorization: Bearer` header to a live user.

pub mod auth;
