//! Route definitions for the `/animals` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::animals;
use crate::state::AppState;

/// Routes mounted at `/animals`. Writes require auth.
///
/// ```text
/// GET    /       -> list
/// POST   /       -> create
/// GET    /{id}   -> get_by_id
/// PUT    /{id}   -> update
/// DELETE /{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(animals::list).post(animals::create))
        .route(
            "/{id}",
            get(animals::get_by_id)
                .put(animals::update)
                .delete(animals::delete),
        )
}
