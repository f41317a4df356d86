//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /redirect`        - Tracking redirect (public)
//! - `GET  /health`          - Health check: DB, ads client mode, scheduler (public)
//! - `POST /api/auth/login`  - Login (public, rate limited)
//! - `/api/*`                - REST API (session token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Configurable allowed origin for the front-end
//! - **Rate limiting** - Per-IP token bucket on login and admin routes
//! - **Authentication** - JWT bearer token, admin role for pool and rotation changes
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// CORS policy for the browser front-end. `*` (or an unparsable value) allows any origin.
pub fn cors_layer(allow_origin: &str) -> CorsLayer {
    let origin = match allow_origin {
        "*" => AllowOrigin::any(),
        origin => match HeaderValue::from_str(origin) {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                ::tracing::warn!(origin = %origin, "Invalid CORS_ALLOW_ORIGIN, allowing any origin");
                AllowOrigin::any()
            }
        },
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `cors_allow_origin` - value of `CORS_ALLOW_ORIGIN`
///
/// Rate limiting keys on the peer address, so serve the result with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn app_router(state: AppState, cors_allow_origin: &str) -> NormalizePath<Router> {
    let login_router = api::routes::public_routes().layer(rate_limit::login_layer());

    let user_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    let admin_router = api::routes::admin_routes()
        .route_layer(middleware::from_fn(auth::admin_layer))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .layer(rate_limit::secure_layer());

    let api_router = Router::new()
        .merge(login_router)
        .merge(user_router)
        .merge(admin_router);

    let router = Router::new()
        .route("/redirect", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(cors_layer(cors_allow_origin))
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
