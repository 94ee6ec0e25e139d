//! Repository for the `zoos` table.

use chrono::Utc;
use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqliteExecutor};
use zoo_core::types::{new_id, DbId};

use crate::models::zoo::{CreateZoo, UpdateZoo, Zoo, ZooSummary};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, location, animal_ids, created_at, updated_at";

/// Provides CRUD operations for zoos.
///
/// Membership (`animal_ids`) is only written through [`ZooRepo::create`] and
/// [`ZooRepo::set_members`]; callers must pair those writes with the
/// matching `animals.zoo_id` change in the same transaction.
pub struct ZooRepo;

impl ZooRepo {
    /// Insert a new zoo, returning the created row.
    pub async fn create(
        executor: impl SqliteExecutor<'_>,
        input: &CreateZoo,
    ) -> Result<Zoo, sqlx::Error> {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO zoos (id, name, location, animal_ids, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Zoo>(&query)
            .bind(new_id())
            .bind(&input.name)
            .bind(&input.location)
            .bind(Json(&input.animal_ids))
            .bind(now)
            .bind(now)
            .fetch_one(executor)
            .await
    }

    /// Find a zoo by ID.
    pub async fn find_by_id(
        executor: impl SqliteExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Zoo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM zoos WHERE id = ?");
        sqlx::query_as::<_, Zoo>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Fetch `{id, name, location}` projections for the given ids.
    ///
    /// Unknown ids are skipped; result order is unspecified.
    pub async fn find_summaries_by_ids(
        executor: impl SqliteExecutor<'_>,
        ids: &[DbId],
    ) -> Result<Vec<ZooSummary>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder =
            QueryBuilder::<Sqlite>::new("SELECT id, name, location FROM zoos WHERE id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");
        builder
            .build_query_as::<ZooSummary>()
            .fetch_all(executor)
            .await
    }

    /// List all zoos ordered by most recently created first.
    pub async fn list(executor: impl SqliteExecutor<'_>) -> Result<Vec<Zoo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM zoos ORDER BY created_at DESC");
        sqlx::query_as::<_, Zoo>(&query).fetch_all(executor).await
    }

    /// Update a zoo's name and location. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        executor: impl SqliteExecutor<'_>,
        id: DbId,
        input: &UpdateZoo,
    ) -> Result<Option<Zoo>, sqlx::Error> {
        let query = format!(
            "UPDATE zoos SET
                name = COALESCE(?, name),
                location = COALESCE(?, location),
                updated_at = ?
             WHERE id = ?
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Zoo>(&query)
            .bind(&input.name)
            .bind(&input.location)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Overwrite a zoo's animal collection. Returns `true` if the row exists.
    pub async fn set_members(
        executor: impl SqliteExecutor<'_>,
        id: DbId,
        animal_ids: &[DbId],
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE zoos SET animal_ids = ?, updated_at = ? WHERE id = ?")
            .bind(Json(animal_ids))
            .bind(Utc::now())
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a zoo, returning the removed row.
    pub async fn delete(
        executor: impl SqliteExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Zoo>, sqlx::Error> {
        let query = format!("DELETE FROM zoos WHERE id = ? RETURNING {COLUMNS}");
        sqlx::query_as::<_, Zoo>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }
}
