//! Repository for the `animals` table.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteExecutor};
use zoo_core::types::{new_id, DbId};

use crate::models::animal::{Animal, CreateAnimal, UpdateAnimal};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, species, zoo_id, created_at, updated_at";

/// Provides CRUD operations for animals.
///
/// Writes to `zoo_id` must be paired with the matching change to the zoo's
/// `animal_ids` in the same transaction.
pub struct AnimalRepo;

impl AnimalRepo {
    /// Insert a new animal, returning the created row.
    pub async fn create(
        executor: impl SqliteExecutor<'_>,
        input: &CreateAnimal,
    ) -> Result<Animal, sqlx::Error> {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO animals (id, name, species, zoo_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Animal>(&query)
            .bind(new_id())
            .bind(&input.name)
            .bind(&input.species)
            .bind(input.zoo_id)
            .bind(now)
            .bind(now)
            .fetch_one(executor)
            .await
    }

    /// Find an animal by ID.
    pub async fn find_by_id(
        executor: impl SqliteExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Animal>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM animals WHERE id = ?");
        sqlx::query_as::<_, Animal>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Fetch every animal whose id is in `ids`.
    ///
    /// Unknown ids are skipped; result order is unspecified.
    pub async fn find_by_ids(
        executor: impl SqliteExecutor<'_>,
        ids: &[DbId],
    ) -> Result<Vec<Animal>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {COLUMNS} FROM animals WHERE id IN ("
        ));
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");
        builder
            .build_query_as::<Animal>()
            .fetch_all(executor)
            .await
    }

    /// List all animals ordered by most recently created first.
    pub async fn list(executor: impl SqliteExecutor<'_>) -> Result<Vec<Animal>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM animals ORDER BY created_at DESC");
        sqlx::query_as::<_, Animal>(&query).fetch_all(executor).await
    }

    /// List the animals whose forward reference points at `zoo_id`.
    pub async fn list_by_zoo(
        executor: impl SqliteExecutor<'_>,
        zoo_id: DbId,
    ) -> Result<Vec<Animal>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM animals WHERE zoo_id = ? ORDER BY created_at ASC");
        sqlx::query_as::<_, Animal>(&query)
            .bind(zoo_id)
            .fetch_all(executor)
            .await
    }

    /// Count the animals whose forward reference points at `zoo_id`.
    pub async fn count_by_zoo(
        executor: impl SqliteExecutor<'_>,
        zoo_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM animals WHERE zoo_id = ?")
            .bind(zoo_id)
            .fetch_one(executor)
            .await?;
        Ok(count)
    }

    /// Update an animal's name and species. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        executor: impl SqliteExecutor<'_>,
        id: DbId,
        input: &UpdateAnimal,
    ) -> Result<Option<Animal>, sqlx::Error> {
        let query = format!(
            "UPDATE animals SET
                name = COALESCE(?, name),
                species = COALESCE(?, species),
                updated_at = ?
             WHERE id = ?
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Animal>(&query)
            .bind(&input.name)
            .bind(&input.species)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Point an animal at a zoo (or at no zoo). Returns `true` if the row exists.
    pub async fn set_zoo(
        executor: impl SqliteExecutor<'_>,
        id: DbId,
        zoo_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE animals SET zoo_id = ?, updated_at = ? WHERE id = ?")
            .bind(zoo_id)
            .bind(Utc::now())
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear the zoo reference on every animal pointing at `zoo_id`.
    ///
    /// Returns the number of animals detached.
    pub async fn detach_all_from_zoo(
        executor: impl SqliteExecutor<'_>,
        zoo_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("UPDATE animals SET zoo_id = NULL, updated_at = ? WHERE zoo_id = ?")
                .bind(Utc::now())
                .bind(zoo_id)
                .execute(executor)
                .await?;
        Ok(result.rows_affected())
    }

    /// Delete every animal pointing at `zoo_id`. Returns the number removed.
    pub async fn delete_all_in_zoo(
        executor: impl SqliteExecutor<'_>,
        zoo_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM animals WHERE zoo_id = ?")
            .bind(zoo_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete an animal, returning the removed row.
    pub async fn delete(
        executor: impl SqliteExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Animal>, sqlx::Error> {
        let query = format!("DELETE FROM animals WHERE id = ? RETURNING {COLUMNS}");
        sqlx::query_as::<_, Animal>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }
}
