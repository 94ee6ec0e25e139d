//! Identity & Session service.
//!
//! Owns the credential lifecycle (register, login, change and reset
//! password) and the authorization decision for protected endpoints. Held
//! in [`AppState`](crate::state::AppState) as an `Arc<IdentityService>`.
//!
//! Tokens are stateless, but [`IdentityService::authorize`] re-fetches the
//! user by the token's subject on every call: a valid signature alone does
//! not grant access to an account that has since been deleted.

use std::sync::OnceLock;

use zoo_core::error::CoreError;
use zoo_core::types::DbId;
use zoo_core::validation::{require_field, require_secret};
use zoo_db::models::user::{CreateUser, User};
use zoo_db::repositories::UserRepo;
use zoo_db::DbPool;

use crate::auth::jwt::{generate_access_token, validate_token, JwtConfig};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};

/// Message shared by every login failure so callers cannot probe usernames.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Literal scheme prefix expected in the `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// A freshly issued session token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

/// Tunables for the credential lifecycle.
#[derive(Debug, Clone)]
pub struct IdentitySettings {
    pub jwt: JwtConfig,
    pub password_min_length: usize,
    pub password_reset_enabled: bool,
}

pub struct IdentityService {
    pool: DbPool,
    settings: IdentitySettings,
}

impl IdentityService {
    pub fn new(pool: DbPool, settings: IdentitySettings) -> Self {
        Self { pool, settings }
    }

    /// Create an account and sign the new user in.
    pub async fn register(
        &self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> AppResult<(User, IssuedToken)> {
        let username = require_field("username", username)?;
        let password = require_secret("password", password)?;
        validate_password_strength(password, self.settings.password_min_length)
            .map_err(CoreError::Validation)?;

        if UserRepo::find_by_username(&self.pool, username).await?.is_some() {
            return Err(username_taken(username));
        }

        let password_hash = hash_blocking(password).await?;
        let input = CreateUser {
            username: username.to_string(),
            password_hash,
        };
        // The unique index still decides races between concurrent registrations.
        let user = UserRepo::create(&self.pool, &input)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    username_taken(username)
                }
                other => AppError::Database(other),
            })?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    /// Exchange a username and password for a session token.
    ///
    /// An unknown username and a wrong password fail identically.
    pub async fn login(
        &self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> AppResult<(User, IssuedToken)> {
        let username = require_field("username", username)?;
        let password = require_secret("password", password)?;

        let user = UserRepo::find_by_username(&self.pool, username).await?;
        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let password_valid = verify_blocking(password, stored_hash).await?;

        match user {
            Some(user) if password_valid => {
                tracing::info!(user_id = %user.id, "Login succeeded");
                let token = self.issue_token(&user)?;
                Ok((user, token))
            }
            _ => {
                tracing::info!(username = %username, "Login failed");
                Err(CoreError::Unauthorized(INVALID_CREDENTIALS.into()).into())
            }
        }
    }

    /// Resolve the raw `Authorization` header value to the current user.
    pub async fn authorize(&self, header: Option<&str>) -> AppResult<User> {
        let token = bearer_token(header)?;
        let claims = validate_token(token, &self.settings.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Rejected session token");
            CoreError::Unauthorized("Invalid or expired token".into())
        })?;

        UserRepo::find_by_id(&self.pool, claims.sub)
            .await?
            .ok_or_else(|| CoreError::not_found("User", claims.sub).into())
    }

    /// Replace the caller's password after re-verifying the current one.
    pub async fn change_password(
        &self,
        user: &User,
        old_password: Option<&str>,
        new_password: Option<&str>,
    ) -> AppResult<()> {
        let old_password = require_secret("old_password", old_password)?;
        let new_password = require_secret("new_password", new_password)?;
        validate_password_strength(new_password, self.settings.password_min_length)
            .map_err(CoreError::Validation)?;

        // Compare against the stored hash, not the one captured at authorization.
        let current = UserRepo::find_by_id(&self.pool, user.id)
            .await?
            .ok_or_else(|| CoreError::not_found("User", user.id))?;
        if !verify_blocking(old_password, Some(current.password_hash)).await? {
            return Err(CoreError::Validation("Current password is incorrect".into()).into());
        }

        let password_hash = hash_blocking(new_password).await?;
        if !UserRepo::update_password(&self.pool, user.id, &password_hash).await? {
            return Err(CoreError::not_found("User", user.id).into());
        }
        tracing::info!(user_id = %user.id, "Password changed");
        Ok(())
    }

    /// Overwrite a password knowing only the username.
    ///
    /// Open to unauthenticated callers: anyone who knows a username can
    /// reset that account. Disable with `PASSWORD_RESET_ENABLED=false`.
    pub async fn reset_password(
        &self,
        username: Option<&str>,
        new_password: Option<&str>,
    ) -> AppResult<()> {
        if !self.settings.password_reset_enabled {
            return Err(CoreError::Forbidden("Password reset is disabled".into()).into());
        }
        let username = require_field("username", username)?;
        let new_password = require_secret("new_password", new_password)?;
        validate_password_strength(new_password, self.settings.password_min_length)
            .map_err(CoreError::Validation)?;

        let user = UserRepo::find_by_username(&self.pool, username)
            .await?
            .ok_or_else(|| CoreError::not_found("User", username))?;

        let password_hash = hash_blocking(new_password).await?;
        if !UserRepo::update_password(&self.pool, user.id, &password_hash).await? {
            return Err(CoreError::not_found("User", user.id).into());
        }
        tracing::warn!(user_id = %user.id, "Password reset by username");
        Ok(())
    }

    /// Delete an account. Callers may only delete themselves.
    pub async fn delete_user(&self, caller: &User, id: DbId) -> AppResult<()> {
        if caller.id != id {
            return Err(CoreError::Forbidden("Users may only delete their own account".into()).into());
        }
        if !UserRepo::delete(&self.pool, id).await? {
            return Err(CoreError::not_found("User", id).into());
        }
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    fn issue_token(&self, user: &User) -> AppResult<IssuedToken> {
        let token = generate_access_token(user.id, &user.username, &self.settings.jwt)
            .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
        Ok(IssuedToken {
            token,
            expires_in: self.settings.jwt.expires_in_secs(),
        })
    }
}

/// Extract the token from an `Authorization` header value.
///
/// The value must be the literal `"Bearer "` followed by a non-empty token.
pub fn bearer_token(header: Option<&str>) -> Result<&str, CoreError> {
    let header =
        header.ok_or_else(|| CoreError::Unauthorized("Missing Authorization header".into()))?;
    let token = header.strip_prefix(BEARER_PREFIX).ok_or_else(|| {
        CoreError::Unauthorized("Invalid Authorization format. Expected: Bearer <token>".into())
    })?;
    if token.trim().is_empty() {
        return Err(CoreError::Unauthorized("Missing bearer token".into()));
    }
    Ok(token)
}

fn username_taken(username: &str) -> AppError {
    CoreError::Conflict(format!("Username '{username}' is already taken")).into()
}

static DUMMY_HASH: OnceLock<String> = OnceLock::new();

/// Hash that unknown usernames verify against, built on first use.
fn dummy_hash() -> Result<&'static str, argon2::password_hash::Error> {
    if let Some(hash) = DUMMY_HASH.get() {
        return Ok(hash);
    }
    let hash = hash_password("zoo-registry-placeholder")?;
    Ok(DUMMY_HASH.get_or_init(|| hash))
}

/// Argon2 is deliberately slow; keep it off the async worker threads.
async fn hash_blocking(password: &str) -> AppResult<String> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::InternalError(format!("Password hashing task failed: {e}")))?
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

/// Verify `password` against `hash`, or against the dummy hash when there
/// is no stored hash. The dummy path always reports a mismatch.
async fn verify_blocking(password: &str, hash: Option<String>) -> AppResult<bool> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || match hash {
        Some(hash) => verify_password(&password, &hash),
        None => verify_password(&password, dummy_hash()?).map(|_| false),
    })
    .await
    .map_err(|e| AppError::InternalError(format!("Password verification task failed: {e}")))?
    .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))
}
