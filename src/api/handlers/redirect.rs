//! Handler for tracking redirects.

use axum::{
    extract::Query,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::debug;

use crate::api::dto::redirect::RedirectQuery;
use crate::error::AppError;
use crate::utils::redirect_target::resolve_redirect;

/// Value of the `X-Redirect-Engine` response header.
pub const REDIRECT_ENGINE: &str = concat!("adlink-rotator/", env!("CARGO_PKG_VERSION"));

/// Forwards ad click traffic to the affiliate target through a landing domain.
///
/// # Endpoint
///
/// `GET /redirect?target=<url>&new_domain=<host>`
///
/// `lpurl` is accepted instead of `target`.
///
/// # Location
///
/// - With `new_domain`: the target's host is replaced, path and query kept
///   (`https://<new_domain>/<target>` if the target is not an absolute URL)
/// - Without: the target itself, `https://`-prefixed when it lacks a scheme
///
/// # Response
///
/// `302 Found` with `Cache-Control: no-cache` and `X-Redirect-Engine`.
///
/// # Errors
///
/// Returns 400 if no target is given.
/// Returns 500 if the resulting location is not a valid header value.
pub async fn redirect_handler(Query(query): Query<RedirectQuery>) -> Result<Response, AppError> {
    let target = query.target().ok_or_else(|| {
        AppError::bad_request(
            "Missing target parameter",
            json!({"expected": ["target", "lpurl"]}),
        )
    })?;

    let location = resolve_redirect(target, query.new_domain());

    let location_header = HeaderValue::from_str(&location).map_err(|e| {
        tracing::error!(location = %location, error = %e, "Redirect location is not a valid header");
        AppError::internal("Failed to build redirect", json!({}))
    })?;

    debug!(target = %target, new_domain = ?query.new_domain(), location = %location, "Redirecting");

    Ok((
        StatusCode::FOUND,
        [
            (header::LOCATION, location_header),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-cache")),
            (
                header::HeaderName::from_static("x-redirect-engine"),
                HeaderValue::from_static(REDIRECT_ENGINE),
            ),
        ],
    )
        .into_response())
}
