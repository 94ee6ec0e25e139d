pub mod animals;
pub mod auth;
pub mod health;
pub mod users;
pub mod zoos;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register                 register (public)
/// /auth/login                    login (public)
/// /auth/me                       current user (requires auth)
/// /auth/change-password          change password (requires auth)
/// /auth/reset-password           reset by username (public, switchable)
///
/// /users                         list
/// /users/{id}                    get, delete own account
///
/// /zoos                          list, create
/// /zoos/{id}                     get, update, delete
/// /zoos/{id}/animals             animals housed in the zoo
///
/// /animals                       list, create
/// /animals/{id}                  get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/zoos", zoos::router())
        .nest("/animals", animals::router())
}
