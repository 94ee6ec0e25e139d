//! Handlers for the `/animals` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Deserializer};
use zoo_core::types::DbId;
use zoo_db::models::animal::{Animal, AnimalDetail};

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /animals`.
#[derive(Debug, Deserialize)]
pub struct CreateAnimalRequest {
    pub name: Option<String>,
    pub species: Option<String>,
    pub zoo: Option<DbId>,
}

/// Request body for `PUT /animals/{id}`.
///
/// `zoo` distinguishes an absent key (keep the link) from `null` (detach).
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAnimalRequest {
    pub name: Option<String>,
    pub species: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub zoo: Option<Option<DbId>>,
}

/// Wrap any present value, including `null`, in `Some`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// POST /api/v1/animals
pub async fn create(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiJson(input): ApiJson<CreateAnimalRequest>,
) -> AppResult<(StatusCode, Json<Animal>)> {
    let animal = state
        .habitat
        .create_animal(input.name.as_deref(), input.species.as_deref(), input.zoo)
        .await?;
    Ok((StatusCode::CREATED, Json(animal)))
}

/// GET /api/v1/animals
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<AnimalDetail>>> {
    Ok(Json(state.habitat.list_animals().await?))
}

/// GET /api/v1/animals/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<AnimalDetail>> {
    Ok(Json(state.habitat.get_animal(id).await?))
}

/// PUT /api/v1/animals/{id}
pub async fn update(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    ApiJson(input): ApiJson<UpdateAnimalRequest>,
) -> AppResult<Json<Animal>> {
    let animal = state
        .habitat
        .update_animal(
            id,
            input.name.as_deref(),
            input.species.as_deref(),
            input.zoo,
        )
        .await?;
    Ok(Json(animal))
}

/// DELETE /api/v1/animals/{id}
pub async fn delete(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.habitat.delete_animal(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_zoo_keeps_link() {
        let req: UpdateAnimalRequest = serde_json::from_str(r#"{"name":"Leo"}"#).unwrap();
        assert_eq!(req.zoo, None);
    }

    #[test]
    fn null_zoo_detaches() {
        let req: UpdateAnimalRequest = serde_json::from_str(r#"{"zoo":null}"#).unwrap();
        assert_eq!(req.zoo, Some(None));
    }

    #[test]
    fn zoo_id_relinks() {
        let id = zoo_core::types::new_id();
        let req: UpdateAnimalRequest =
            serde_json::from_str(&format!(r#"{{"zoo":"{id}"}}"#)).unwrap();
        assert_eq!(req.zoo, Some(Some(id)));
    }
}
