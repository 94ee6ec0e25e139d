//! Route definitions for the `/zoos` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::zoos;
use crate::state::AppState;

/// Routes mounted at `/zoos`. Writes require auth.
///
/// ```text
/// GET    /               -> list
/// POST   /               -> create
/// GET    /{id}           -> get_by_id
/// PUT    /{id}           -> update
/// DELETE /{id}           -> delete
/// GET    /{id}/animals   -> list_animals
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(zoos::list).post(zoos::create))
        .route(
            "/{id}",
            get(zoos::get_by_id).put(zoos::update).delete(zoos::delete),
        )
        .route("/{id}/animals", get(zoos::list_animals))
}
