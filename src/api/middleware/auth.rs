//! Bearer token authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::application::services::Claims;
use crate::{error::AppError, state::AppState};

/// Authenticates requests using the session JWT from the Authorization header.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// On success the decoded [`Claims`] are stored in the request extensions,
/// where handlers pick them up with `Extension<Claims>`.
///
/// # Errors
///
/// Returns `401 Unauthorized` (with `WWW-Authenticate: Bearer`) if the header
/// is missing or malformed, or the token is forged or expired.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    let claims = st.auth_service.verify_token(&token)?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Rejects authenticated callers without the admin role.
///
/// Must run after [`layer`].
///
/// # Errors
///
/// Returns `401` if no claims are present, `403` if the role is missing.
pub async fn admin_layer(req: Request, next: Next) -> Result<Response, AppError> {
    let claims = req.extensions().get::<Claims>().ok_or_else(|| {
        AppError::unauthorized("Unauthorized", json!({"reason": "Missing session"}))
    })?;

    claims.require_admin()?;

    Ok(next.run(req).await)
}
