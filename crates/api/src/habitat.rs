//! Habitat Graph service.
//!
//! Owns the zoo/animal edge. The forward reference lives on the animal
//! (`animals.zoo_id`) and the reverse reference on the zoo (`zoos.animal_ids`);
//! every mutation here writes both sides inside one transaction.
//!
//! Each transaction starts with a write. SQLite grants the write lock on the
//! first write, so a transaction never reads a zoo's collection before it
//! holds the lock, and concurrent appends to the same zoo serialize.

use std::collections::{HashMap, HashSet};

use sqlx::SqliteConnection;
use zoo_core::error::CoreError;
use zoo_core::habitat::{check_candidates, find_duplicate, link_member, unlink_member, ZooDeletionPolicy};
use zoo_core::types::DbId;
use zoo_core::validation::{optional_field, require_field};
use zoo_db::models::animal::{Animal, AnimalDetail, CreateAnimal, UpdateAnimal};
use zoo_db::models::zoo::{CreateZoo, UpdateZoo, Zoo, ZooDetail, ZooSummary};
use zoo_db::repositories::{AnimalRepo, ZooRepo};
use zoo_db::DbPool;

use crate::error::AppResult;

pub struct HabitatService {
    pool: DbPool,
    deletion_policy: ZooDeletionPolicy,
}

impl HabitatService {
    pub fn new(pool: DbPool, deletion_policy: ZooDeletionPolicy) -> Self {
        Self {
            pool,
            deletion_policy,
        }
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Create a zoo whose collection is exactly `animal_ids`, in order.
    ///
    /// Every listed animal must exist and appear once. Listed animals are
    /// moved into the new zoo: their forward reference is set and they are
    /// removed from the collection of any zoo that held them before.
    pub async fn create_zoo(
        &self,
        name: Option<&str>,
        location: Option<&str>,
        animal_ids: Vec<DbId>,
    ) -> AppResult<Zoo> {
        let name = require_field("name", name)?;
        let location = require_field("location", location)?;
        if let Some(dup) = find_duplicate(&animal_ids) {
            return Err(CoreError::Validation(format!("animal {dup} is listed more than once")).into());
        }

        let input = CreateZoo {
            name: name.to_string(),
            location: location.to_string(),
            animal_ids,
        };

        let mut tx = self.pool.begin().await?;
        let zoo = ZooRepo::create(&mut *tx, &input).await?;

        let animals = AnimalRepo::find_by_ids(&mut *tx, &zoo.animal_ids).await?;
        let resolved: Vec<DbId> = animals.iter().map(|a| a.id).collect();
        // Dropping `tx` on the error path rolls the insert back.
        check_candidates(&zoo.animal_ids, &resolved)?;

        for animal in &animals {
            if let Some(previous) = animal.zoo_id.filter(|prev| *prev != zoo.id) {
                unlink_from_zoo(&mut *tx, previous, animal.id).await?;
            }
            AnimalRepo::set_zoo(&mut *tx, animal.id, Some(zoo.id)).await?;
        }

        tx.commit().await?;
        tracing::info!(
            zoo_id = %zoo.id,
            animal_count = zoo.animal_ids.len(),
            "Zoo created"
        );
        Ok(zoo)
    }

    /// Create an animal, optionally housed in `zoo_id`.
    pub async fn create_animal(
        &self,
        name: Option<&str>,
        species: Option<&str>,
        zoo_id: Option<DbId>,
    ) -> AppResult<Animal> {
        let input = CreateAnimal {
            name: require_field("name", name)?.to_string(),
            species: require_field("species", species)?.to_string(),
            zoo_id,
        };

        let mut tx = self.pool.begin().await?;
        let animal = AnimalRepo::create(&mut *tx, &input).await?;
        if let Some(zoo_id) = animal.zoo_id {
            link_to_zoo(&mut *tx, zoo_id, animal.id).await?;
        }
        tx.commit().await?;

        tracing::info!(animal_id = %animal.id, zoo_id = ?animal.zoo_id, "Animal created");
        Ok(animal)
    }

    /// Update an animal's fields and, when `zoo` is supplied, its zoo.
    ///
    /// `zoo` is tri-state: `None` leaves the link alone, `Some(None)`
    /// detaches the animal, `Some(Some(id))` moves it to zoo `id`.
    pub async fn update_animal(
        &self,
        id: DbId,
        name: Option<&str>,
        species: Option<&str>,
        zoo: Option<Option<DbId>>,
    ) -> AppResult<Animal> {
        let input = UpdateAnimal {
            name: optional_field("name", name)?.map(str::to_string),
            species: optional_field("species", species)?.map(str::to_string),
        };

        let mut tx = self.pool.begin().await?;
        let mut animal = AnimalRepo::update(&mut *tx, id, &input)
            .await?
            .ok_or_else(|| CoreError::not_found("Animal", id))?;

        if let Some(target) = zoo {
            if target != animal.zoo_id {
                if let Some(previous) = animal.zoo_id {
                    unlink_from_zoo(&mut *tx, previous, animal.id).await?;
                }
                if let Some(next) = target {
                    link_to_zoo(&mut *tx, next, animal.id).await?;
                }
                AnimalRepo::set_zoo(&mut *tx, animal.id, target).await?;
                tracing::info!(
                    animal_id = %animal.id,
                    from = ?animal.zoo_id,
                    to = ?target,
                    "Animal relinked"
                );
                animal.zoo_id = target;
            }
        }

        tx.commit().await?;
        Ok(animal)
    }

    /// Update a zoo's own fields. Membership is not writable here.
    pub async fn update_zoo(
        &self,
        id: DbId,
        name: Option<&str>,
        location: Option<&str>,
    ) -> AppResult<Zoo> {
        let input = UpdateZoo {
            name: optional_field("name", name)?.map(str::to_string),
            location: optional_field("location", location)?.map(str::to_string),
        };
        let zoo = ZooRepo::update(&self.pool, id, &input)
            .await?
            .ok_or_else(|| CoreError::not_found("Zoo", id))?;
        Ok(zoo)
    }

    /// Delete an animal and remove it from its zoo's collection.
    pub async fn delete_animal(&self, id: DbId) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        let animal = AnimalRepo::delete(&mut *tx, id)
            .await?
            .ok_or_else(|| CoreError::not_found("Animal", id))?;
        if let Some(zoo_id) = animal.zoo_id {
            unlink_from_zoo(&mut *tx, zoo_id, animal.id).await?;
        }
        tx.commit().await?;

        tracing::info!(animal_id = %id, zoo_id = ?animal.zoo_id, "Animal deleted");
        Ok(())
    }

    /// Delete a zoo, applying the configured [`ZooDeletionPolicy`] to the
    /// animals that reference it.
    pub async fn delete_zoo(&self, id: DbId) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        ZooRepo::delete(&mut *tx, id)
            .await?
            .ok_or_else(|| CoreError::not_found("Zoo", id))?;

        let affected = match self.deletion_policy {
            ZooDeletionPolicy::Detach => AnimalRepo::detach_all_from_zoo(&mut *tx, id).await?,
            ZooDeletionPolicy::Cascade => AnimalRepo::delete_all_in_zoo(&mut *tx, id).await?,
            ZooDeletionPolicy::Reject => {
                let housed = AnimalRepo::count_by_zoo(&mut *tx, id).await?;
                if housed > 0 {
                    return Err(CoreError::Conflict(format!(
                        "Zoo {id} still houses {housed} animal(s)"
                    ))
                    .into());
                }
                0
            }
        };
        tx.commit().await?;

        tracing::info!(
            zoo_id = %id,
            policy = %self.deletion_policy,
            affected_animals = affected,
            "Zoo deleted"
        );
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    pub async fn get_zoo(&self, id: DbId) -> AppResult<ZooDetail> {
        let zoo = ZooRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| CoreError::not_found("Zoo", id))?;
        let animals = AnimalRepo::find_by_ids(&self.pool, &zoo.animal_ids).await?;
        let by_id: HashMap<DbId, Animal> = animals.into_iter().map(|a| (a.id, a)).collect();
        let animals = in_collection_order(&zoo.animal_ids, &by_id);
        Ok(ZooDetail::new(zoo, animals))
    }

    /// All zoos with their collections expanded. Animals are fetched once.
    pub async fn list_zoos(&self) -> AppResult<Vec<ZooDetail>> {
        let zoos = ZooRepo::list(&self.pool).await?;
        let by_id: HashMap<DbId, Animal> = AnimalRepo::list(&self.pool)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();
        Ok(zoos
            .into_iter()
            .map(|zoo| {
                let animals = in_collection_order(&zoo.animal_ids, &by_id);
                ZooDetail::new(zoo, animals)
            })
            .collect())
    }

    pub async fn get_animal(&self, id: DbId) -> AppResult<AnimalDetail> {
        let animal = AnimalRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| CoreError::not_found("Animal", id))?;
        let zoo = match animal.zoo_id {
            Some(zoo_id) => ZooRepo::find_summaries_by_ids(&self.pool, &[zoo_id])
                .await?
                .into_iter()
                .next(),
            None => None,
        };
        Ok(AnimalDetail::new(animal, zoo))
    }

    /// All animals with their zoo expanded. Zoo summaries are fetched once.
    pub async fn list_animals(&self) -> AppResult<Vec<AnimalDetail>> {
        let animals = AnimalRepo::list(&self.pool).await?;
        let zoo_ids: Vec<DbId> = animals
            .iter()
            .filter_map(|a| a.zoo_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let zoos: HashMap<DbId, ZooSummary> = ZooRepo::find_summaries_by_ids(&self.pool, &zoo_ids)
            .await?
            .into_iter()
            .map(|z| (z.id, z))
            .collect();
        Ok(animals
            .into_iter()
            .map(|animal| {
                let zoo = animal.zoo_id.and_then(|id| zoos.get(&id).cloned());
                AnimalDetail::new(animal, zoo)
            })
            .collect())
    }

    /// Animals whose forward reference points at `zoo_id`.
    pub async fn animals_by_zoo(&self, zoo_id: DbId) -> AppResult<Vec<Animal>> {
        if ZooRepo::find_by_id(&self.pool, zoo_id).await?.is_none() {
            return Err(CoreError::not_found("Zoo", zoo_id).into());
        }
        Ok(AnimalRepo::list_by_zoo(&self.pool, zoo_id).await?)
    }
}

/// Append `animal_id` to zoo `zoo_id`'s collection. The zoo must exist.
async fn link_to_zoo(conn: &mut SqliteConnection, zoo_id: DbId, animal_id: DbId) -> AppResult<()> {
    let mut zoo = ZooRepo::find_by_id(&mut *conn, zoo_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Zoo", zoo_id))?;
    if link_member(&mut zoo.animal_ids, animal_id) {
        ZooRepo::set_members(&mut *conn, zoo_id, &zoo.animal_ids).await?;
        tracing::debug!(%zoo_id, %animal_id, "Linked animal");
    }
    Ok(())
}

/// Remove `animal_id` from zoo `zoo_id`'s collection. A missing zoo is
/// tolerated.
async fn unlink_from_zoo(
    conn: &mut SqliteConnection,
    zoo_id: DbId,
    animal_id: DbId,
) -> Result<(), sqlx::Error> {
    let Some(mut zoo) = ZooRepo::find_by_id(&mut *conn, zoo_id).await? else {
        tracing::warn!(%zoo_id, %animal_id, "Referenced zoo is gone, nothing to unlink");
        return Ok(());
    };
    if unlink_member(&mut zoo.animal_ids, animal_id) {
        ZooRepo::set_members(&mut *conn, zoo_id, &zoo.animal_ids).await?;
        tracing::debug!(%zoo_id, %animal_id, "Unlinked animal");
    }
    Ok(())
}

/// Resolve a collection against fetched animals, keeping collection order.
/// Ids without a record are skipped.
fn in_collection_order(ids: &[DbId], by_id: &HashMap<DbId, Animal>) -> Vec<Animal> {
    ids.iter().filter_map(|id| by_id.get(id).cloned()).collect()
}
