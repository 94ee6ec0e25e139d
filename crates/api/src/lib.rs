//! Zoo registry API server library.
//!
//! Exposes the building blocks (config, state, services, error handling,
//! routes) so integration tests and the binary entrypoint can both access
//! them.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod habitat;
pub mod handlers;
pub mod identity;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;
