//! Handlers for the `/auth` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use zoo_db::models::user::{User, UserResponse};

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::identity::IssuedToken;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register` and `POST /auth/login`.
///
/// Fields are optional so a missing field is reported as a validation error
/// naming it rather than as a JSON rejection.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Request body for `POST /auth/change-password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

/// Request body for `POST /auth/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub username: Option<String>,
    pub new_password: Option<String>,
}

/// Successful authentication response returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub token_type: &'static str,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

impl AuthResponse {
    fn new(user: &User, issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            token_type: "Bearer",
            expires_in: issued.expires_in,
            user: UserResponse::from(user),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CredentialsRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let (user, issued) = state
        .identity
        .register(input.username.as_deref(), input.password.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(AuthResponse::new(&user, issued))))
}

/// POST /api/v1/auth/login
///
/// Unknown usernames and wrong passwords both return 401 with the same message.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CredentialsRequest>,
) -> AppResult<Json<AuthResponse>> {
    let (user, issued) = state
        .identity
        .login(input.username.as_deref(), input.password.as_deref())
        .await?;
    Ok(Json(AuthResponse::new(&user, issued)))
}

/// GET /api/v1/auth/me
pub async fn me(auth: AuthUser) -> Json<UserResponse> {
    Json(UserResponse::from(&auth.user))
}

/// POST /api/v1/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(input): ApiJson<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    state
        .identity
        .change_password(
            &auth.user,
            input.old_password.as_deref(),
            input.new_password.as_deref(),
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/auth/reset-password
///
/// Unauthenticated. Returns 403 when disabled by configuration.
pub async fn reset_password(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    state
        .identity
        .reset_password(input.username.as_deref(), input.new_password.as_deref())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
