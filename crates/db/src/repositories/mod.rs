//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept any SQLite executor as the first argument: pass `&pool` for a
//! standalone statement or `&mut *tx` to take part in a transaction.

pub mod animal_repo;
pub mod user_repo;
pub mod zoo_repo;

pub use animal_repo::AnimalRepo;
pub use user_repo::UserRepo;
pub use zoo_repo::ZooRepo;
