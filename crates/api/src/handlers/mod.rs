//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource. Auth
//! and habitat handlers delegate to the services on
//! [`AppState`](crate::state::AppState); read-only user handlers go straight
//! to the repository. Errors map to responses via
//! [`AppError`](crate::error::AppError).

pub mod animals;
pub mod auth;
pub mod users;
pub mod zoos;
