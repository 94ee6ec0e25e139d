//! Row models and DTOs, one module per table.

pub mod animal;
pub mod user;
pub mod zoo;
