//! Animal entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use zoo_core::types::{DbId, Timestamp};

use super::zoo::ZooSummary;

/// A row from the `animals` table. `zoo_id` is the forward side of the
/// zoo/animal edge.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Animal {
    pub id: DbId,
    pub name: String,
    pub species: String,
    pub zoo_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An animal with its zoo reference expanded into a [`ZooSummary`].
///
/// `zoo` is `None` when the animal is unattached.
#[derive(Debug, Clone, Serialize)]
pub struct AnimalDetail {
    pub id: DbId,
    pub name: String,
    pub species: String,
    pub zoo_id: Option<DbId>,
    pub zoo: Option<ZooSummary>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AnimalDetail {
    pub fn new(animal: Animal, zoo: Option<ZooSummary>) -> Self {
        Self {
            id: animal.id,
            name: animal.name,
            species: animal.species,
            zoo_id: animal.zoo_id,
            zoo,
            created_at: animal.created_at,
            updated_at: animal.updated_at,
        }
    }
}

/// DTO for inserting an animal. Fields are already validated.
#[derive(Debug)]
pub struct CreateAnimal {
    pub name: String,
    pub species: String,
    pub zoo_id: Option<DbId>,
}

/// DTO for updating an animal's own fields. The zoo link is changed only
/// through [`AnimalRepo::set_zoo`](crate::repositories::AnimalRepo::set_zoo).
#[derive(Debug, Default)]
pub struct UpdateAnimal {
    pub name: Option<String>,
    pub species: Option<String>,
}
