//! Handlers for login and the current user's profile.

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use validator::Validate;

use crate::api::dto::auth::{LoginRequest, LoginResponse, ProfileResponse};
use crate::application::services::Claims;
use crate::error::AppError;
use crate::state::AppState;

/// Exchanges username and password for a session token.
///
/// # Endpoint
///
/// `POST /api/auth/login`
///
/// # Request Body
///
/// ```json
/// { "username": "alice", "password": "..." }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "token": "eyJ...",
///   "token_type": "Bearer",
///   "expires_at": "2026-01-02T10:00:00Z",
///   "user": { "id": 1, "username": "alice", "email": null, "status": "active", "last_login_at": null },
///   "roles": [{ "id": 1, "name": "admin", "description": "Administrator" }],
///   "menus": [{ "id": 1, "name": "Dashboard", "path": "/dashboard", "icon": "home", "parent_id": null, "sort_order": 1 }]
/// }
/// ```
///
/// # Errors
///
/// Returns 400 if a field is empty, 401 on bad credentials or a disabled account.
pub async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let outcome = state
        .auth_service
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(LoginResponse {
        token: outcome.token,
        token_type: "Bearer",
        expires_at: outcome.expires_at,
        profile: outcome.profile.into(),
    }))
}

/// Returns the authenticated user with current roles and menus.
///
/// # Endpoint
///
/// `GET /api/auth/profile`
pub async fn profile_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state.auth_service.profile(&claims).await?;
    Ok(Json(profile.into()))
}
