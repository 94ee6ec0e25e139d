//! Pure domain logic for the zoo registry.
//!
//! Nothing in this crate performs I/O: the store adapter lives in `zoo-db`
//! and the HTTP surface in `zoo-api`.

pub mod error;
pub mod habitat;
pub mod types;
pub mod validation;
