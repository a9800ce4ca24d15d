//! User directory endpoints.
//!
//! - `GET    /api/users/` — list accounts
//! - `POST   /api/users/signup/` — register an account
//! - `POST   /api/users/login/` — look up an account by email
//! - `GET    /api/users/:id/` — account details
//! - `PATCH  /api/users/:id/` — partial update
//! - `DELETE /api/users/:id/` — remove account and its reservations
//!
//! Authentication and session security are outside this service: no
//! credential material is stored and login only establishes that the
//! account exists.

use crate::error::ApiError;
use crate::server::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use eventhub_core::types::{User, UserId, UserPatch, UserRole};
use serde::Deserialize;
use uuid::Uuid;

/// Request body for registering an account.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    /// Email address (unique).
    pub email: String,
    /// Display name.
    pub name: String,
    /// Role; defaults to a regular user.
    #[serde(default)]
    pub role: UserRole,
    /// Accepted for compatibility with the original client; never stored.
    #[serde(default)]
    #[allow(dead_code)]
    pub password: Option<String>,
}

/// Request body for looking up an account.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address to look up.
    pub email: String,
    /// Accepted for compatibility with the original client; never checked.
    #[serde(default)]
    #[allow(dead_code)]
    pub password: Option<String>,
}

/// List all accounts.
pub async fn list(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(state.hub.users().await)
}

/// Register a new account.
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state
        .hub
        .signup(&request.email, &request.name, request.role)
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Look up an account by email.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.hub.login(&request.email).await?))
}

/// Get account details by id.
pub async fn get_one(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.hub.user(UserId::from_uuid(id)).await?))
}

/// Apply a partial update to an account.
pub async fn update(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.hub.update_user(UserId::from_uuid(id), patch).await?))
}

/// Remove an account; its reservations go with it and confirmed tickets are
/// returned to their events.
pub async fn remove(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.hub.remove_user(UserId::from_uuid(id)).await?))
}
