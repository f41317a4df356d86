//! API route configuration.
//!
//! Everything except login requires a session token, see
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    create_domain_handler, create_link_handler, dashboard_stats_handler, domain_list_handler,
    link_list_handler, link_logs_handler, login_handler, profile_handler, run_rotation_handler,
    update_domain_handler, update_link_status_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch, post},
};

/// Routes reachable without a token.
///
/// - `POST /auth/login` - Exchange credentials for a session token
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login_handler))
}

/// Routes for any authenticated user.
///
/// - `GET   /auth/profile`     - Current user, roles and menus
/// - `GET   /links`            - Own links (filters + pagination)
/// - `POST  /links`            - Create a link
/// - `PATCH /links/{id}`       - Start/stop a link
/// - `GET   /links/{id}/logs`  - Rotation history of a link
/// - `GET   /dashboard/stats`  - Own link counters
/// - `GET   /domains`          - Active domains in selection order
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/profile", get(profile_handler))
        .route("/links", get(link_list_handler).post(create_link_handler))
        .route("/links/{id}", patch(update_link_status_handler))
        .route("/links/{id}/logs", get(link_logs_handler))
        .route("/dashboard/stats", get(dashboard_stats_handler))
        .route("/domains", get(domain_list_handler))
}

/// Routes that also require the `admin` role.
///
/// - `POST  /domains`       - Add a domain to the pool
/// - `PATCH /domains/{id}`  - Activate/deactivate a domain, set referer override
/// - `POST  /rotation/run`  - Run one rotation batch now
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/domains", post(create_domain_handler))
        .route("/domains/{id}", patch(update_domain_handler))
        .route("/rotation/run", post(run_rotation_handler))
}
