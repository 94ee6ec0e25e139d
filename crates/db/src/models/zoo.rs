//! Zoo entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use zoo_core::types::{DbId, Timestamp};

use super::animal::Animal;

/// A row from the `zoos` table.
///
/// `animal_ids` is the reverse side of the zoo/animal edge, stored as a JSON
/// array and kept in step with `animals.zoo_id`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Zoo {
    pub id: DbId,
    pub name: String,
    pub location: String,
    #[sqlx(json)]
    pub animal_ids: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Partial zoo projection embedded in expanded animal responses.
#[derive(Debug, Clone, FromRow, Serialize, PartialEq, Eq)]
pub struct ZooSummary {
    pub id: DbId,
    pub name: String,
    pub location: String,
}

/// A zoo with its animal collection expanded into full records,
/// in collection order.
#[derive(Debug, Clone, Serialize)]
pub struct ZooDetail {
    pub id: DbId,
    pub name: String,
    pub location: String,
    pub animals: Vec<Animal>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ZooDetail {
    pub fn new(zoo: Zoo, animals: Vec<Animal>) -> Self {
        Self {
            id: zoo.id,
            name: zoo.name,
            location: zoo.location,
            animals,
            created_at: zoo.created_at,
            updated_at: zoo.updated_at,
        }
    }
}

/// DTO for inserting a zoo. Fields are already validated.
#[derive(Debug)]
pub struct CreateZoo {
    pub name: String,
    pub location: String,
    pub animal_ids: Vec<DbId>,
}

/// DTO for updating a zoo's own fields. Membership is not writable here.
#[derive(Debug, Default)]
pub struct UpdateZoo {
    pub name: Option<String>,
    pub location: Option<String>,
}
