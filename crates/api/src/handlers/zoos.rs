//! Handlers for the `/zoos` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use zoo_core::types::DbId;
use zoo_db::models::animal::Animal;
use zoo_db::models::zoo::{Zoo, ZooDetail};

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /zoos`.
#[derive(Debug, Deserialize)]
pub struct CreateZooRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    /// Animal ids forming the initial collection, in order. Absent and
    /// `null` both mean an empty collection.
    pub animals: Option<Vec<DbId>>,
}

/// Request body for `PUT /zoos/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateZooRequest {
    pub name: Option<String>,
    pub location: Option<String>,
}

/// POST /api/v1/zoos
pub async fn create(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiJson(input): ApiJson<CreateZooRequest>,
) -> AppResult<(StatusCode, Json<Zoo>)> {
    let zoo = state
        .habitat
        .create_zoo(
            input.name.as_deref(),
            input.location.as_deref(),
            input.animals.unwrap_or_default(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(zoo)))
}

/// GET /api/v1/zoos
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<ZooDetail>>> {
    Ok(Json(state.habitat.list_zoos().await?))
}

/// GET /api/v1/zoos/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ZooDetail>> {
    Ok(Json(state.habitat.get_zoo(id).await?))
}

/// PUT /api/v1/zoos/{id}
pub async fn update(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    ApiJson(input): ApiJson<UpdateZooRequest>,
) -> AppResult<Json<Zoo>> {
    let zoo = state
        .habitat
        .update_zoo(id, input.name.as_deref(), input.location.as_deref())
        .await?;
    Ok(Json(zoo))
}

/// DELETE /api/v1/zoos/{id}
pub async fn delete(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.habitat.delete_zoo(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/zoos/{id}/animals
pub async fn list_animals(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Animal>>> {
    Ok(Json(state.habitat.animals_by_zoo(id).await?))
}
